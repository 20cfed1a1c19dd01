//! Integration tests that hit a public Ethereum RPC endpoint.
//!
//! These are marked `#[ignore]` by default because they require network
//! access. Run them explicitly with:
//!
//!   cargo test --test integration -- --ignored

use ethers::providers::Middleware;
use ethers::types::U256;

use mortalcoin_evm_cli::eth;

const SEPOLIA_RPC: &str = "https://ethereum-sepolia-rpc.publicnode.com";
const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

#[tokio::test]
#[ignore]
async fn connect_reports_sepolia_chain_id() {
	let provider = eth::connect(SEPOLIA_RPC).await.expect("failed to connect");
	let chain_id = provider.get_chainid().await.expect("chain ID query failed");
	assert_eq!(chain_id, U256::from(SEPOLIA_CHAIN_ID));
}

#[tokio::test]
#[ignore]
async fn tip_block_number_is_positive() {
	let provider = eth::connect(SEPOLIA_RPC).await.expect("failed to connect");
	let tip = provider
		.get_block_number()
		.await
		.expect("failed to fetch tip");
	assert!(tip.as_u64() > 0, "tip block number should be positive, got {tip}");
}

#[tokio::test]
#[ignore]
async fn connect_rejects_unreachable_endpoint() {
	let result = eth::connect("http://127.0.0.1:1/rpc").await;
	assert!(result.is_err(), "connecting to a dead endpoint should fail");
}

#[tokio::test]
#[ignore]
async fn signer_binds_to_node_chain_id() {
	use ethers::signers::Signer;

	let client = eth::connect_signer(
		SEPOLIA_RPC,
		"0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
	)
	.await
	.expect("failed to build signing client");

	assert_eq!(client.signer().chain_id(), SEPOLIA_CHAIN_ID);
}
