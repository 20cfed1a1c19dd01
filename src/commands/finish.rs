use anyhow::Result;
use ethers::abi::Token;
use ethers::utils::to_checksum;

use crate::cli::Cli;
use crate::commands::{resolve_contract_address, resolve_rpc, send_and_confirm};
use crate::config::Config;
use crate::contract;
use crate::eth;
use crate::game;

/// Finish a game, settling both positions and paying out the winner.
pub async fn run(cli: &Cli, private_key: &str, game_id: &str) -> Result<()> {
	let config = Config::load()?;
	let rpc_url = resolve_rpc(cli, &config)?;
	let contract_address = resolve_contract_address(cli, &config)?;
	let game_id_num = eth::parse_u256(game_id, "game ID")?;

	let client = eth::connect_signer(&rpc_url, private_key).await?;
	let contract = contract::instance(contract_address, client.clone())?;

	println!("Finishing game {game_id}...");

	let call = contract.method::<_, ()>("finishGame", game_id_num)?;
	let receipt = send_and_confirm(client.as_ref(), call).await?;
	println!("Transaction hash: {:#x}", receipt.transaction_hash);

	if let Some(log) =
		contract::find_event_log(contract.abi(), &receipt, contract_address, "GameFinished")?
	{
		if let Some(Token::Address(winner)) = contract::log_param(&log, "winner") {
			println!("Winner: {}", to_checksum(winner, None));
		}
	}

	let info = game::fetch_game_info(&contract, game_id_num).await?;
	println!("Game information:");
	println!("{}", info.to_pretty_json()?);

	Ok(())
}
