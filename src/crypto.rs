use std::fmt;

use anyhow::{anyhow, Result};
use ethers::abi::{encode, Token};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, U256};
use ethers::utils::keccak256;

// -- Position direction --

/// Bet direction of a position. Encoded on-chain as uint8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Long,
	Short,
}

impl Direction {
	pub fn as_u8(self) -> u8 {
		match self {
			Self::Long => 0,
			Self::Short => 1,
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Long => write!(f, "Long"),
			Self::Short => write!(f, "Short"),
		}
	}
}

// -- Commitments --

/// Commitment stored on-chain when a position is posted:
/// `keccak256(abi.encode(uint256 direction, uint256 nonce))`.
///
/// The direction stays hidden until the close reveals both preimage
/// components.
pub fn hashed_direction(direction: Direction, nonce: U256) -> [u8; 32] {
	keccak256(encode(&[
		Token::Uint(U256::from(direction.as_u8())),
		Token::Uint(nonce),
	]))
}

// -- Authorization digests --
//
// Each digest is signed as an EIP-191 personal message, matching the
// `toEthSignedMessageHash` + ECDSA.recover verification the contract
// performs.

/// Digest player1 signs to authorize player2 joining their game.
pub fn join_authorization_digest(game_id: U256, player2: Address, player2_pool: Address) -> [u8; 32] {
	keccak256(encode(&[
		Token::Uint(game_id),
		Token::Address(player2),
		Token::Address(player2_pool),
	]))
}

/// Digest the backend signs to authorize posting a position.
pub fn post_position_digest(game_id: U256, player: Address, hashed_direction: [u8; 32]) -> [u8; 32] {
	keccak256(encode(&[
		Token::Uint(game_id),
		Token::Address(player),
		Token::FixedBytes(hashed_direction.to_vec()),
	]))
}

/// Digest the backend signs to authorize closing a position.
pub fn close_position_digest(
	game_id: U256,
	player: Address,
	direction: Direction,
	nonce: U256,
) -> [u8; 32] {
	keccak256(encode(&[
		Token::Uint(game_id),
		Token::Address(player),
		Token::Uint(U256::from(direction.as_u8())),
		Token::Uint(nonce),
	]))
}

/// Sign a digest as a personal message, returning the 65-byte recoverable
/// signature in calldata form.
pub async fn sign_digest(wallet: &LocalWallet, digest: [u8; 32]) -> Result<Bytes> {
	let signature = wallet
		.sign_message(digest)
		.await
		.map_err(|e| anyhow!("signing failed: {e}"))?;
	Ok(signature.to_vec().into())
}

/// Fresh 256-bit nonce for a position commitment.
pub fn random_nonce() -> U256 {
	U256::from_big_endian(&rand::random::<[u8; 32]>())
}

#[cfg(test)]
mod tests {
	use super::*;
	use ethers::types::Signature;
	use ethers::utils::hash_message;

	fn addr(byte: u8) -> Address {
		Address::from([byte; 20])
	}

	#[test]
	fn direction_wire_values() {
		assert_eq!(Direction::Long.as_u8(), 0);
		assert_eq!(Direction::Short.as_u8(), 1);
	}

	#[test]
	fn direction_displays_capitalized() {
		assert_eq!(Direction::Long.to_string(), "Long");
		assert_eq!(Direction::Short.to_string(), "Short");
	}

	#[test]
	fn hashed_direction_is_deterministic() {
		let nonce = U256::from(12345u64);
		let a = hashed_direction(Direction::Long, nonce);
		let b = hashed_direction(Direction::Long, nonce);
		assert_eq!(a, b);
	}

	#[test]
	fn hashed_direction_hides_direction_behind_nonce() {
		let nonce = U256::from(12345u64);
		assert_ne!(
			hashed_direction(Direction::Long, nonce),
			hashed_direction(Direction::Short, nonce),
		);
		assert_ne!(
			hashed_direction(Direction::Long, nonce),
			hashed_direction(Direction::Long, nonce + 1),
		);
	}

	#[test]
	fn digests_bind_all_inputs() {
		let base = join_authorization_digest(U256::from(1u64), addr(2), addr(3));
		assert_ne!(
			base,
			join_authorization_digest(U256::from(2u64), addr(2), addr(3)),
		);
		assert_ne!(
			base,
			join_authorization_digest(U256::from(1u64), addr(2), addr(4)),
		);
	}

	#[test]
	fn post_and_close_digests_are_domain_separated() {
		let commitment = hashed_direction(Direction::Long, U256::from(9u64));
		let post = post_position_digest(U256::from(1u64), addr(2), commitment);
		let close = close_position_digest(U256::from(1u64), addr(2), Direction::Long, U256::from(9u64));
		assert_ne!(post, close);
	}

	#[tokio::test]
	async fn signature_recovers_to_signer_address() {
		let wallet: LocalWallet =
			"0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
				.parse()
				.unwrap();
		let digest = join_authorization_digest(U256::from(7u64), addr(1), addr(2));

		let bytes = sign_digest(&wallet, digest).await.unwrap();
		assert_eq!(bytes.len(), 65);

		let signature = Signature::try_from(bytes.as_ref()).unwrap();
		let recovered = signature.recover(hash_message(digest)).unwrap();
		assert_eq!(recovered, wallet.address());
	}

	#[test]
	fn random_nonces_differ() {
		assert_ne!(random_nonce(), random_nonce());
	}
}
