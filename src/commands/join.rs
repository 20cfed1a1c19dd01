use anyhow::Result;
use ethers::signers::Signer;
use ethers::utils::to_checksum;

use crate::cli::Cli;
use crate::commands::{resolve_contract_address, resolve_rpc, send_and_confirm};
use crate::config::Config;
use crate::contract;
use crate::crypto;
use crate::eth;
use crate::game;

/// Join an existing game as player2.
///
/// Player1's key only signs the off-chain join authorization; the
/// transaction itself is sent (and paid for) by player2.
pub async fn run(
	cli: &Cli,
	game_id: &str,
	player1_privkey: &str,
	player2_privkey: &str,
	player2_pool: &str,
	bet_amount: &str,
) -> Result<()> {
	let config = Config::load()?;
	let rpc_url = resolve_rpc(cli, &config)?;
	let contract_address = resolve_contract_address(cli, &config)?;
	let game_id_num = eth::parse_u256(game_id, "game ID")?;
	let pool = eth::parse_address(player2_pool, "player2 pool address")?;
	let bet_wei = eth::parse_ether_amount(bet_amount)?;

	let client = eth::connect_signer(&rpc_url, player2_privkey).await?;
	let player2 = client.signer().address();
	let player1 = eth::parse_private_key(player1_privkey)?;

	let digest = crypto::join_authorization_digest(game_id_num, player2, pool);
	let authorization = crypto::sign_digest(&player1, digest).await?;

	let contract = contract::instance(contract_address, client.clone())?;

	println!(
		"Joining game {game_id} with bet amount {bet_amount} ETH and player2 pool address {}...",
		to_checksum(&pool, None)
	);

	let call = contract
		.method::<_, ()>("joinGame", (game_id_num, pool, authorization))?
		.value(bet_wei);
	let receipt = send_and_confirm(client.as_ref(), call).await?;
	println!("Transaction hash: {:#x}", receipt.transaction_hash);

	if contract::find_event_log(contract.abi(), &receipt, contract_address, "GameJoined")?.is_none()
	{
		println!("Warning: no GameJoined event found in the receipt logs.");
	}

	let info = game::fetch_game_info(&contract, game_id_num).await?;
	println!("Game information:");
	println!("{}", info.to_pretty_json()?);
	if let Some(end) = info.end_time_utc() {
		println!("Game ends at: {end}");
	}

	Ok(())
}
