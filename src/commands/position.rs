use anyhow::Result;
use ethers::abi::Token;
use ethers::signers::Signer;
use ethers::types::{I256, U256};

use crate::cli::Cli;
use crate::commands::{resolve_contract_address, resolve_rpc, send_and_confirm};
use crate::config::Config;
use crate::contract;
use crate::crypto::{self, Direction};
use crate::eth;

/// Post a position commitment for a game.
///
/// Only the hash of (direction, nonce) goes on-chain; the backend
/// signature authorizes the post without learning anything extra.
pub async fn post(
	cli: &Cli,
	player_privkey: &str,
	backend_privkey: &str,
	game_id: &str,
	direction: Direction,
	nonce: Option<&str>,
) -> Result<()> {
	let config = Config::load()?;
	let rpc_url = resolve_rpc(cli, &config)?;
	let contract_address = resolve_contract_address(cli, &config)?;
	let game_id_num = eth::parse_u256(game_id, "game ID")?;

	let nonce = match nonce {
		Some(raw) => eth::parse_u256(raw, "nonce")?,
		None => {
			let fresh = crypto::random_nonce();
			println!("Generated nonce: {fresh:#x}");
			fresh
		}
	};

	let client = eth::connect_signer(&rpc_url, player_privkey).await?;
	let player = client.signer().address();
	let backend = eth::parse_private_key(backend_privkey)?;

	let commitment = crypto::hashed_direction(direction, nonce);
	let digest = crypto::post_position_digest(game_id_num, player, commitment);
	let signature = crypto::sign_digest(&backend, digest).await?;

	let contract = contract::instance(contract_address, client.clone())?;

	println!("Posting {direction} position for game {game_id} with nonce {nonce:#x}...");

	let call = contract.method::<_, ()>("postPosition", (game_id_num, commitment, signature))?;
	let receipt = send_and_confirm(client.as_ref(), call).await?;

	println!("Transaction hash: {:#x}", receipt.transaction_hash);
	println!("Keep the nonce: it is required to close the position.");

	Ok(())
}

/// Close a posted position by revealing its direction and nonce.
pub async fn close(
	cli: &Cli,
	player_privkey: &str,
	backend_privkey: &str,
	game_id: &str,
	direction: Direction,
	nonce: &str,
) -> Result<()> {
	let config = Config::load()?;
	let rpc_url = resolve_rpc(cli, &config)?;
	let contract_address = resolve_contract_address(cli, &config)?;
	let game_id_num = eth::parse_u256(game_id, "game ID")?;
	let nonce = eth::parse_u256(nonce, "nonce")?;

	let client = eth::connect_signer(&rpc_url, player_privkey).await?;
	let player = client.signer().address();
	let backend = eth::parse_private_key(backend_privkey)?;

	let digest = crypto::close_position_digest(game_id_num, player, direction, nonce);
	let signature = crypto::sign_digest(&backend, digest).await?;

	let contract = contract::instance(contract_address, client.clone())?;

	println!("Closing {direction} position for game {game_id}...");

	let call = contract.method::<_, ()>(
		"closePosition",
		(
			game_id_num,
			U256::from(direction.as_u8()),
			nonce,
			signature,
		),
	)?;
	let receipt = send_and_confirm(client.as_ref(), call).await?;
	println!("Transaction hash: {:#x}", receipt.transaction_hash);

	if let Some(log) =
		contract::find_event_log(contract.abi(), &receipt, contract_address, "PositionClosed")?
	{
		if let Some(Token::Int(raw)) = contract::log_param(&log, "pnl") {
			println!("Position closed with PnL: {}", I256::from_raw(*raw));
		}
	}

	Ok(())
}
