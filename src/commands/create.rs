use anyhow::Result;
use ethers::types::U256;
use ethers::utils::to_checksum;

use crate::cli::Cli;
use crate::commands::{resolve_contract_address, resolve_rpc, send_and_confirm};
use crate::config::Config;
use crate::contract;
use crate::eth;
use crate::game;

/// Create a new game with the given bet and pool, then report the new
/// game's state.
pub async fn run(cli: &Cli, private_key: &str, bet_amount: &str, pool_address: &str) -> Result<()> {
	let config = Config::load()?;
	let rpc_url = resolve_rpc(cli, &config)?;
	let contract_address = resolve_contract_address(cli, &config)?;
	let pool = eth::parse_address(pool_address, "pool address")?;
	let bet_wei = eth::parse_ether_amount(bet_amount)?;

	let client = eth::connect_signer(&rpc_url, private_key).await?;
	let contract = contract::instance(contract_address, client.clone())?;

	println!(
		"Creating game with bet amount {bet_amount} ETH and pool address {}...",
		to_checksum(&pool, None)
	);

	let call = contract.method::<_, U256>("createGame", pool)?.value(bet_wei);
	let receipt = send_and_confirm(client.as_ref(), call).await?;
	println!("Transaction hash: {:#x}", receipt.transaction_hash);

	let game_id = match contract::game_id_from_receipt(contract.abi(), &receipt, contract_address)? {
		Some(id) => Some(id),
		None => {
			// Deployments that predate the GameCreated event leave no log;
			// the counter points one past the game we just created.
			let current = game::current_game_id(&contract).await?;
			if current.is_zero() {
				None
			} else {
				Some(current - 1)
			}
		}
	};

	match game_id {
		Some(game_id) => {
			println!("Game created with ID: {game_id}");
			println!("Retrieving game information...");
			let info = game::fetch_game_info(&contract, game_id).await?;
			println!("Game information:");
			println!("{}", info.to_pretty_json()?);
			if let Some(end) = info.end_time_utc() {
				println!("Game ends at: {end}");
			}
		}
		None => println!("Failed to retrieve game ID."),
	}

	Ok(())
}
