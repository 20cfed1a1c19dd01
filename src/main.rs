use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod contract;
mod crypto;
mod eth;
mod game;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	match &cli.command {
		Command::CreateGameCommand {
			private_key,
			bet_amount,
			pool_address,
		} => commands::create::run(&cli, private_key, bet_amount, pool_address).await,
		Command::JoinGameCommand {
			game_id,
			player1_privkey,
			player2_privkey,
			player2_pool,
			bet_amount,
		} => {
			commands::join::run(
				&cli,
				game_id,
				player1_privkey,
				player2_privkey,
				player2_pool,
				bet_amount,
			)
			.await
		}
		Command::ValidateCreateGameCommand {
			game_id,
			tx_hash,
			pool_address,
		} => commands::validate::validate_create(&cli, game_id, tx_hash, pool_address).await,
		Command::ValidateJoinGameCommand {
			game_id,
			player2_pool,
			tx_hash,
		} => commands::validate::validate_join(&cli, game_id, player2_pool, tx_hash).await,
		Command::PostPositionCommand {
			player_privkey,
			backend_privkey,
			game_id,
			direction,
			nonce,
		} => {
			commands::position::post(
				&cli,
				player_privkey,
				backend_privkey,
				game_id,
				(*direction).into(),
				nonce.as_deref(),
			)
			.await
		}
		Command::ClosePositionCommand {
			player_privkey,
			backend_privkey,
			game_id,
			direction,
			nonce,
		} => {
			commands::position::close(
				&cli,
				player_privkey,
				backend_privkey,
				game_id,
				(*direction).into(),
				nonce,
			)
			.await
		}
		Command::FinishGameCommand {
			private_key,
			game_id,
		} => commands::finish::run(&cli, private_key, game_id).await,
	}
}
