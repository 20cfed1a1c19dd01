use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Result};
use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TransactionReceipt, H256, U256};

/// Provider stack used for every state-changing command: HTTP transport
/// plus a local in-memory signer.
pub type EthClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Maximum time to wait for a transaction to be mined.
pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);
/// Interval between receipt polls.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Gas estimates are padded by 20% to absorb state drift between
/// estimation and inclusion.
const GAS_BUFFER_NUM: u64 = 120;
const GAS_BUFFER_DEN: u64 = 100;

/// Connect to an RPC endpoint for read-only queries.
///
/// The chain ID fetch doubles as a connectivity check so that a bad
/// endpoint fails here rather than midway through a command.
pub async fn connect(rpc_url: &str) -> Result<Arc<Provider<Http>>> {
	let provider = Provider::<Http>::try_from(rpc_url)
		.map_err(|e| anyhow!("invalid RPC URL {rpc_url}: {e}"))?;
	provider
		.get_chainid()
		.await
		.map_err(|e| anyhow!("failed to connect to Ethereum node at {rpc_url}: {e}"))?;
	Ok(Arc::new(provider))
}

/// Connect to an RPC endpoint with a signing account attached.
///
/// The wallet is bound to the node's chain ID so signatures are
/// replay-protected per EIP-155.
pub async fn connect_signer(rpc_url: &str, private_key: &str) -> Result<Arc<EthClient>> {
	let provider = Provider::<Http>::try_from(rpc_url)
		.map_err(|e| anyhow!("invalid RPC URL {rpc_url}: {e}"))?;
	let chain_id = provider
		.get_chainid()
		.await
		.map_err(|e| anyhow!("failed to connect to Ethereum node at {rpc_url}: {e}"))?;

	let wallet = parse_private_key(private_key)?.with_chain_id(chain_id.as_u64());
	Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

pub fn parse_private_key(key: &str) -> Result<LocalWallet> {
	key.trim()
		.parse::<LocalWallet>()
		.map_err(|e| anyhow!("invalid private key: {e}"))
}

/// Estimate gas for a prepared call and apply the 20% buffer.
pub async fn with_gas_buffer<M: Middleware, D: Detokenize>(
	call: ContractCall<M, D>,
) -> Result<ContractCall<M, D>> {
	let estimate = call
		.estimate_gas()
		.await
		.map_err(|e| anyhow!("gas estimation failed: {e}"))?;
	let padded = estimate * U256::from(GAS_BUFFER_NUM) / U256::from(GAS_BUFFER_DEN);
	Ok(call.gas(padded))
}

/// Poll for a transaction receipt until it appears or the timeout hits.
pub async fn await_receipt<M: Middleware>(client: &M, tx_hash: H256) -> Result<TransactionReceipt> {
	let started = Instant::now();

	loop {
		let receipt = client
			.get_transaction_receipt(tx_hash)
			.await
			.map_err(|e| anyhow!("receipt query failed: {e}"))?;

		if let Some(receipt) = receipt {
			return Ok(receipt);
		}

		if started.elapsed() >= RECEIPT_TIMEOUT {
			bail!(
				"transaction {tx_hash:#x} not mined within {} seconds",
				RECEIPT_TIMEOUT.as_secs()
			);
		}

		tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
	}
}

/// Fail if the receipt reports a reverted execution.
pub fn ensure_success(receipt: &TransactionReceipt) -> Result<()> {
	if receipt.status == Some(0u64.into()) {
		bail!(
			"transaction {:#x} reverted (gas used: {})",
			receipt.transaction_hash,
			receipt.gas_used.unwrap_or_default()
		);
	}
	Ok(())
}

// -- Input normalization --

pub fn parse_address(s: &str, what: &str) -> Result<Address> {
	s.trim()
		.parse::<Address>()
		.map_err(|_| anyhow!("invalid {what}: {s}"))
}

pub fn parse_tx_hash(s: &str) -> Result<H256> {
	let clean = s.trim().strip_prefix("0x").unwrap_or(s.trim());
	clean
		.parse()
		.map_err(|e| anyhow!("invalid transaction hash {s}: {e}"))
}

/// Parse a numeric argument given either as decimal or 0x-prefixed hex.
pub fn parse_u256(s: &str, what: &str) -> Result<U256> {
	let s = s.trim();
	let parsed = match s.strip_prefix("0x") {
		Some("") => None,
		Some(hex) => U256::from_str_radix(hex, 16).ok(),
		None => U256::from_dec_str(s).ok(),
	};
	parsed.ok_or_else(|| {
		anyhow!("invalid {what} format: {s}. Must be a decimal number or 0x-prefixed hex")
	})
}

/// Convert a decimal ETH amount string to wei.
pub fn parse_ether_amount(s: &str) -> Result<U256> {
	ethers::utils::parse_ether(s.trim()).map_err(|e| anyhow!("invalid bet amount {s}: {e}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_u256_accepts_decimal_and_hex() {
		assert_eq!(parse_u256("42", "game ID").unwrap(), U256::from(42u64));
		assert_eq!(parse_u256("0x2a", "game ID").unwrap(), U256::from(42u64));
		assert_eq!(parse_u256("0", "game ID").unwrap(), U256::zero());
	}

	#[test]
	fn parse_u256_rejects_garbage() {
		for bad in ["", "abc", "0x", "0xzz", "12.5", "-3"] {
			let err = parse_u256(bad, "game ID").unwrap_err();
			assert!(
				err.to_string().contains("game ID"),
				"error should name the argument: {err}"
			);
		}
	}

	#[test]
	fn parse_address_accepts_prefixed_and_bare_hex() {
		let with_prefix =
			parse_address("0x5FbDB2315678afecb367f032d93F642f64180aa3", "pool address").unwrap();
		let bare =
			parse_address("5FbDB2315678afecb367f032d93F642f64180aa3", "pool address").unwrap();
		assert_eq!(with_prefix, bare);
	}

	#[test]
	fn parse_address_rejects_short_input() {
		assert!(parse_address("0x1234", "pool address").is_err());
		assert!(parse_address("", "pool address").is_err());
	}

	#[test]
	fn parse_tx_hash_requires_32_bytes() {
		let ok = parse_tx_hash(
			"0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
		);
		assert!(ok.is_ok());
		assert!(parse_tx_hash("0xdeadbeef").is_err());
	}

	#[test]
	fn parse_ether_amount_converts_to_wei() {
		assert_eq!(
			parse_ether_amount("1").unwrap(),
			U256::exp10(18),
		);
		assert_eq!(
			parse_ether_amount("0.5").unwrap(),
			U256::exp10(18) / U256::from(2u64),
		);
		assert!(parse_ether_amount("not-a-number").is_err());
	}

	fn test_tx_hash() -> H256 {
		"0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b"
			.parse()
			.unwrap()
	}

	#[tokio::test]
	async fn await_receipt_polls_until_mined() {
		let (provider, mock) = Provider::mocked();
		let mined = TransactionReceipt {
			transaction_hash: test_tx_hash(),
			status: Some(1u64.into()),
			..Default::default()
		};
		// Responses pop in reverse push order: the first poll sees a
		// pending (null) receipt, the second sees the mined one.
		mock.push(mined).unwrap();
		mock.push(serde_json::Value::Null).unwrap();

		let receipt = await_receipt(&provider, test_tx_hash()).await.unwrap();
		assert_eq!(receipt.transaction_hash, test_tx_hash());
		assert_eq!(receipt.status, Some(1u64.into()));
	}

	#[test]
	fn ensure_success_rejects_reverted_receipt() {
		let reverted = TransactionReceipt {
			transaction_hash: test_tx_hash(),
			status: Some(0u64.into()),
			..Default::default()
		};
		let err = ensure_success(&reverted).unwrap_err();
		assert!(err.to_string().contains("reverted"), "unexpected error: {err}");
	}

	#[test]
	fn ensure_success_accepts_mined_and_pre_byzantium_receipts() {
		let mined = TransactionReceipt {
			status: Some(1u64.into()),
			..Default::default()
		};
		assert!(ensure_success(&mined).is_ok());

		// Pre-Byzantium receipts carry no status field at all.
		let legacy = TransactionReceipt {
			status: None,
			..Default::default()
		};
		assert!(ensure_success(&legacy).is_ok());
	}

	#[test]
	fn parse_private_key_rejects_malformed_hex() {
		assert!(parse_private_key("0x1234").is_err());
		assert!(parse_private_key(
			"0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
		)
		.is_ok());
	}
}
