use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use ethers::contract::Contract;
use ethers::providers::Middleware;
use ethers::types::{Address, I256, U256};
use ethers::utils::to_checksum;
use serde::Serialize;

/// Raw layout of the `games(uint256)` getter. Solidity uint8 fields come
/// back as `Token::Uint`, so they decode through U256 here.
type RawPosition = (U256, [u8; 32], U256);
type RawGame = (
	U256,        // betAmount
	Address,     // player1
	U256,        // gameEndTimestamp
	Address,     // player1Pool
	Address,     // player2
	Address,     // player2Pool
	U256,        // state
	RawPosition, // player1Position
	RawPosition, // player2Position
	I256,        // player1Pnl
	I256,        // player2Pnl
);

/// Printable snapshot of one game slot, keyed the way the contract names
/// its fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
	pub bet_amount: String,
	pub player1: String,
	pub game_end_timestamp: u64,
	pub player1_pool: String,
	pub player2: String,
	pub player2_pool: String,
	pub state: u8,
	pub player1_position: PositionInfo,
	pub player2_position: PositionInfo,
	pub player1_pnl: String,
	pub player2_pnl: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInfo {
	pub opening_price: String,
	pub hashed_direction: String,
	pub state: u8,
}

impl GameInfo {
	fn from_raw(raw: RawGame) -> Self {
		let (
			bet_amount,
			player1,
			game_end_timestamp,
			player1_pool,
			player2,
			player2_pool,
			state,
			player1_position,
			player2_position,
			player1_pnl,
			player2_pnl,
		) = raw;

		Self {
			bet_amount: bet_amount.to_string(),
			player1: to_checksum(&player1, None),
			game_end_timestamp: game_end_timestamp.low_u64(),
			player1_pool: to_checksum(&player1_pool, None),
			player2: to_checksum(&player2, None),
			player2_pool: to_checksum(&player2_pool, None),
			state: state.low_u64() as u8,
			player1_position: PositionInfo::from_raw(player1_position),
			player2_position: PositionInfo::from_raw(player2_position),
			player1_pnl: player1_pnl.to_string(),
			player2_pnl: player2_pnl.to_string(),
		}
	}

	/// The game's end timestamp as UTC, when one is set.
	pub fn end_time_utc(&self) -> Option<DateTime<Utc>> {
		if self.game_end_timestamp == 0 {
			return None;
		}
		DateTime::from_timestamp(self.game_end_timestamp as i64, 0)
	}

	pub fn to_pretty_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

impl PositionInfo {
	fn from_raw(raw: RawPosition) -> Self {
		let (opening_price, hashed_direction, state) = raw;
		Self {
			opening_price: opening_price.to_string(),
			hashed_direction: format!("0x{}", hex::encode(hashed_direction)),
			state: state.low_u64() as u8,
		}
	}
}

/// Read one game slot from the contract.
pub async fn fetch_game_info<M: Middleware>(
	contract: &Contract<M>,
	game_id: U256,
) -> Result<GameInfo> {
	let raw: RawGame = contract
		.method::<_, RawGame>("games", game_id)
		.map_err(|e| anyhow!("failed to prepare games call: {e}"))?
		.call()
		.await
		.map_err(|e| anyhow!("games({game_id}) call failed: {e}"))?;
	Ok(GameInfo::from_raw(raw))
}

/// Read the contract's monotonically increasing game counter.
pub async fn current_game_id<M: Middleware>(contract: &Contract<M>) -> Result<U256> {
	contract
		.method::<_, U256>("currentGameId", ())
		.map_err(|e| anyhow!("failed to prepare currentGameId call: {e}"))?
		.call()
		.await
		.map_err(|e| anyhow!("currentGameId call failed: {e}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn raw_game() -> RawGame {
		let player1: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap();
		(
			U256::exp10(18),
			player1,
			U256::from(1_700_000_000u64),
			Address::from([0x11; 20]),
			Address::zero(),
			Address::zero(),
			U256::from(1u64),
			(U256::from(50_000u64), [0xab; 32], U256::from(1u64)),
			(U256::zero(), [0u8; 32], U256::zero()),
			I256::from(-5),
			I256::from(5),
		)
	}

	#[test]
	fn json_keys_match_contract_field_names() {
		let info = GameInfo::from_raw(raw_game());
		let value = serde_json::to_value(&info).unwrap();

		assert_eq!(value["betAmount"], "1000000000000000000");
		assert_eq!(value["gameEndTimestamp"], 1_700_000_000u64);
		assert_eq!(value["state"], 1);
		assert_eq!(value["player1Pnl"], "-5");
		assert_eq!(value["player2Pnl"], "5");
		assert_eq!(value["player1Position"]["openingPrice"], "50000");
		assert_eq!(value["player2Position"]["state"], 0);
	}

	#[test]
	fn addresses_render_in_checksum_form() {
		let info = GameInfo::from_raw(raw_game());
		assert_eq!(info.player1, "0x5FbDB2315678afecb367f032d93F642f64180aa3");
	}

	#[test]
	fn hashed_direction_renders_as_prefixed_hex() {
		let info = GameInfo::from_raw(raw_game());
		assert!(info.player1_position.hashed_direction.starts_with("0x"));
		assert_eq!(info.player1_position.hashed_direction.len(), 66);
		assert_eq!(
			info.player2_position.hashed_direction,
			format!("0x{}", "00".repeat(32)),
		);
	}

	#[test]
	fn end_time_is_none_for_unset_timestamp() {
		let mut info = GameInfo::from_raw(raw_game());
		assert!(info.end_time_utc().is_some());

		info.game_end_timestamp = 0;
		assert!(info.end_time_utc().is_none());
	}
}
