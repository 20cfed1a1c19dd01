use std::sync::Arc;

use anyhow::{anyhow, Result};
use ethers::abi::{Abi, Token};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, Transaction, TransactionReceipt, H256, U256};
use thiserror::Error;

use crate::cli::Cli;
use crate::commands::{resolve_contract_address, resolve_rpc};
use crate::config::Config;
use crate::contract;
use crate::eth;
use crate::game;

#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("transaction {0:#x} not found")]
	TxNotFound(H256),
	#[error("validation failed for transaction {0:#x}")]
	ChecksFailed(H256),
}

/// Outcome of each check `validate-create-game-command` performs.
#[derive(Debug, Clone, Copy)]
pub struct CreateGameChecks {
	pub confirmed: bool,
	pub successful: bool,
	pub called_create_game: bool,
	pub pool_address_match: bool,
	pub game_id_valid: bool,
}

impl CreateGameChecks {
	pub fn all_passed(&self) -> bool {
		self.confirmed
			&& self.successful
			&& self.called_create_game
			&& self.pool_address_match
			&& self.game_id_valid
	}
}

/// Outcome of each check `validate-join-game-command` performs.
#[derive(Debug, Clone, Copy)]
pub struct JoinGameChecks {
	pub confirmed: bool,
	pub successful: bool,
	pub called_join_game: bool,
	pub game_id_match: bool,
	pub pool_address_match: bool,
}

impl JoinGameChecks {
	pub fn all_passed(&self) -> bool {
		self.confirmed
			&& self.successful
			&& self.called_join_game
			&& self.game_id_match
			&& self.pool_address_match
	}
}

/// Evaluate a fetched create-game transaction against expectations.
///
/// Pure so it can be exercised against fabricated transactions without
/// an RPC endpoint.
pub fn evaluate_create_game(
	abi: &Abi,
	contract_address: Address,
	expected_game_id: U256,
	expected_pool: Address,
	tx: &Transaction,
	receipt: Option<&TransactionReceipt>,
) -> Result<CreateGameChecks> {
	let confirmed = tx.block_number.is_some();
	let successful = receipt.is_some_and(|r| r.status == Some(1u64.into()));

	let function = abi
		.function("createGame")
		.map_err(|e| anyhow!("ABI is missing createGame: {e}"))?;

	let mut called_create_game = false;
	let mut pool_address_match = false;
	if tx.to == Some(contract_address) && calldata_selector_matches(tx, &function.short_signature())
	{
		if let Ok(tokens) = function.decode_input(&tx.input[4..]) {
			called_create_game = true;
			pool_address_match =
				matches!(tokens.first(), Some(Token::Address(pool)) if *pool == expected_pool);
		}
	}

	let game_id_valid = match receipt {
		Some(receipt) => {
			contract::game_id_from_receipt(abi, receipt, contract_address)?
				== Some(expected_game_id)
		}
		None => false,
	};

	Ok(CreateGameChecks {
		confirmed,
		successful,
		called_create_game,
		pool_address_match,
		game_id_valid,
	})
}

/// Evaluate a fetched join-game transaction against expectations.
pub fn evaluate_join_game(
	abi: &Abi,
	contract_address: Address,
	expected_game_id: U256,
	expected_pool: Address,
	tx: &Transaction,
	receipt: Option<&TransactionReceipt>,
) -> Result<JoinGameChecks> {
	let confirmed = tx.block_number.is_some();
	let successful = receipt.is_some_and(|r| r.status == Some(1u64.into()));

	let function = abi
		.function("joinGame")
		.map_err(|e| anyhow!("ABI is missing joinGame: {e}"))?;

	let mut called_join_game = false;
	let mut game_id_match = false;
	let mut pool_address_match = false;
	if tx.to == Some(contract_address) && calldata_selector_matches(tx, &function.short_signature())
	{
		if let Ok(tokens) = function.decode_input(&tx.input[4..]) {
			called_join_game = true;
			game_id_match =
				matches!(tokens.first(), Some(Token::Uint(id)) if *id == expected_game_id);
			pool_address_match =
				matches!(tokens.get(1), Some(Token::Address(pool)) if *pool == expected_pool);
		}
	}

	Ok(JoinGameChecks {
		confirmed,
		successful,
		called_join_game,
		game_id_match,
		pool_address_match,
	})
}

fn calldata_selector_matches(tx: &Transaction, selector: &[u8; 4]) -> bool {
	tx.input.len() >= 4 && tx.input[..4] == selector[..]
}

/// Run `validate-create-game-command`.
pub async fn validate_create(
	cli: &Cli,
	game_id: &str,
	tx_hash: &str,
	pool_address: &str,
) -> Result<()> {
	let config = Config::load()?;
	let rpc_url = resolve_rpc(cli, &config)?;
	let contract_address = resolve_contract_address(cli, &config)?;
	let game_id_num = eth::parse_u256(game_id, "game ID")?;
	let pool = eth::parse_address(pool_address, "pool address")?;
	let hash = eth::parse_tx_hash(tx_hash)?;

	let provider = eth::connect(&rpc_url).await?;
	let abi = contract::mortalcoin_abi()?;

	println!("Validating transaction {tx_hash} for game ID {game_id}...");

	let (tx, receipt) = fetch_tx_and_receipt(provider.as_ref(), hash).await?;
	let checks =
		evaluate_create_game(&abi, contract_address, game_id_num, pool, &tx, receipt.as_ref())?;

	if checks.all_passed() {
		println!("Validation successful!");
	} else {
		println!("Validation failed!");
	}
	println!("Results:");
	print_check("Transaction confirmed", checks.confirmed);
	print_check("Transaction successful", checks.successful);
	print_check("Called createGame function", checks.called_create_game);
	print_check("Pool address matches", checks.pool_address_match);
	print_check("Game ID valid", checks.game_id_valid);

	print_game_info(provider, contract_address, game_id_num).await?;

	if !checks.all_passed() {
		return Err(ValidationError::ChecksFailed(hash).into());
	}
	Ok(())
}

/// Run `validate-join-game-command`.
pub async fn validate_join(
	cli: &Cli,
	game_id: &str,
	player2_pool: &str,
	tx_hash: &str,
) -> Result<()> {
	let config = Config::load()?;
	let rpc_url = resolve_rpc(cli, &config)?;
	let contract_address = resolve_contract_address(cli, &config)?;
	let game_id_num = eth::parse_u256(game_id, "game ID")?;
	let pool = eth::parse_address(player2_pool, "pool address")?;
	let hash = eth::parse_tx_hash(tx_hash)?;

	let provider = eth::connect(&rpc_url).await?;
	let abi = contract::mortalcoin_abi()?;

	println!("Validating transaction {tx_hash} for game ID {game_id}...");

	let (tx, receipt) = fetch_tx_and_receipt(provider.as_ref(), hash).await?;
	let checks =
		evaluate_join_game(&abi, contract_address, game_id_num, pool, &tx, receipt.as_ref())?;

	if checks.all_passed() {
		println!("Validation successful!");
	} else {
		println!("Validation failed!");
	}
	println!("Results:");
	print_check("Transaction confirmed", checks.confirmed);
	print_check("Transaction successful", checks.successful);
	print_check("Called joinGame function", checks.called_join_game);
	print_check("Game ID matches", checks.game_id_match);
	print_check("Pool address matches", checks.pool_address_match);

	print_game_info(provider, contract_address, game_id_num).await?;

	if !checks.all_passed() {
		return Err(ValidationError::ChecksFailed(hash).into());
	}
	Ok(())
}

async fn fetch_tx_and_receipt<M: Middleware>(
	provider: &M,
	hash: H256,
) -> Result<(Transaction, Option<TransactionReceipt>)> {
	let tx = provider
		.get_transaction(hash)
		.await
		.map_err(|e| anyhow!("transaction query failed: {e}"))?
		.ok_or(ValidationError::TxNotFound(hash))?;
	let receipt = provider
		.get_transaction_receipt(hash)
		.await
		.map_err(|e| anyhow!("receipt query failed: {e}"))?;
	Ok((tx, receipt))
}

async fn print_game_info(
	provider: Arc<Provider<Http>>,
	contract_address: Address,
	game_id: U256,
) -> Result<()> {
	let contract = contract::instance(contract_address, provider)?;
	let info = game::fetch_game_info(&contract, game_id).await?;
	println!();
	println!("Game information:");
	println!("{}", info.to_pretty_json()?);
	Ok(())
}

fn print_check(label: &str, ok: bool) {
	println!("- {label}: {ok}");
}
