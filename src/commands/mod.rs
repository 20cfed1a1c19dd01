pub mod create;
pub mod finish;
pub mod join;
pub mod position;
pub mod validate;

use anyhow::{anyhow, Result};
use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::providers::Middleware;
use ethers::types::{Address, TransactionReceipt};

use crate::cli::Cli;
use crate::config::Config;
use crate::eth;

/// Resolve the RPC URL from CLI flag/env or config.
pub fn resolve_rpc(cli: &Cli, config: &Config) -> Result<String> {
	cli.rpc_url
		.clone()
		.or_else(|| config.network.rpc_url.clone())
		.ok_or_else(|| {
			anyhow!(
				"No RPC endpoint configured. Pass --rpc-url, set MORTALCOIN_RPC_URL, \
				 or add network.rpc_url to ~/.mortalcoin/config.toml"
			)
		})
}

/// Resolve the contract address from CLI flag/env or config.
pub fn resolve_contract_address(cli: &Cli, config: &Config) -> Result<Address> {
	let raw = cli
		.contract_address
		.clone()
		.or_else(|| config.network.contract_address.clone())
		.ok_or_else(|| {
			anyhow!(
				"No contract address configured. Pass --contract-address, set \
				 MORTALCOIN_CONTRACT_ADDRESS, or add network.contract_address to \
				 ~/.mortalcoin/config.toml"
			)
		})?;
	eth::parse_address(&raw, "contract address")
}

/// Shared submit path: pad gas, send, poll for the receipt, and fail on
/// a reverted execution.
pub async fn send_and_confirm<M: Middleware, D: Detokenize>(
	client: &M,
	call: ContractCall<M, D>,
) -> Result<TransactionReceipt> {
	let call = eth::with_gas_buffer(call).await?;

	let pending = call
		.send()
		.await
		.map_err(|e| anyhow!("transaction submission failed: {e}"))?;
	let tx_hash = *pending;
	drop(pending);

	println!("Transaction sent: {tx_hash:#x}");
	println!("Waiting for transaction to be mined...");

	let receipt = eth::await_receipt(client, tx_hash).await?;
	eth::ensure_success(&receipt)?;
	println!(
		"Transaction successful! Gas used: {}",
		receipt.gas_used.unwrap_or_default()
	);

	Ok(receipt)
}
