use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use ethers::abi::{Abi, RawLog, Token};
use ethers::contract::Contract;
use ethers::providers::Middleware;
use ethers::types::{Address, TransactionReceipt, U256};

/// The MortalCoin contract ABI, embedded at build time so the binary is
/// self-contained.
pub const MORTALCOIN_ABI_JSON: &str = include_str!("../abi/mortalcoin.json");

pub fn mortalcoin_abi() -> Result<Abi> {
	serde_json::from_str(MORTALCOIN_ABI_JSON).context("embedded MortalCoin ABI is malformed")
}

/// Bind the MortalCoin contract at `address` to a provider or signing client.
pub fn instance<M: Middleware>(address: Address, client: Arc<M>) -> Result<Contract<M>> {
	Ok(Contract::new(address, mortalcoin_abi()?, client))
}

/// Find and decode the first log in `receipt` emitted by `contract` for the
/// named event. Returns `None` when the event was not emitted.
pub fn find_event_log(
	abi: &Abi,
	receipt: &TransactionReceipt,
	contract: Address,
	event_name: &str,
) -> Result<Option<ethers::abi::Log>> {
	let event = abi
		.event(event_name)
		.map_err(|e| anyhow!("unknown event {event_name}: {e}"))?;
	let signature = event.signature();

	for log in &receipt.logs {
		if log.address != contract {
			continue;
		}
		if log.topics.first() != Some(&signature) {
			continue;
		}
		let raw = RawLog {
			topics: log.topics.clone(),
			data: log.data.to_vec(),
		};
		let parsed = event
			.parse_log(raw)
			.map_err(|e| anyhow!("malformed {event_name} log: {e}"))?;
		return Ok(Some(parsed));
	}

	Ok(None)
}

/// Extract the game ID from the `GameCreated` log of a create-game receipt.
///
/// The game ID is the first indexed parameter, so it sits in topic 1 of
/// the matching log.
pub fn game_id_from_receipt(
	abi: &Abi,
	receipt: &TransactionReceipt,
	contract: Address,
) -> Result<Option<U256>> {
	let signature = abi
		.event("GameCreated")
		.map_err(|e| anyhow!("unknown event GameCreated: {e}"))?
		.signature();

	for log in &receipt.logs {
		if log.address != contract || log.topics.first() != Some(&signature) {
			continue;
		}
		if let Some(topic) = log.topics.get(1) {
			return Ok(Some(U256::from_big_endian(topic.as_bytes())));
		}
	}

	Ok(None)
}

/// Look up a named parameter in a decoded log.
pub fn log_param<'a>(log: &'a ethers::abi::Log, name: &str) -> Option<&'a Token> {
	log.params
		.iter()
		.find(|p| p.name == name)
		.map(|p| &p.value)
}
