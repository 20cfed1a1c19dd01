use clap::{Parser, Subcommand, ValueEnum};

use crate::crypto::Direction;

#[derive(Parser)]
#[command(
	name = "mortalcoin",
	about = "CLI tool for interacting with the MortalCoin smart contract.",
	version
)]
pub struct Cli {
	/// URL of the Ethereum RPC endpoint.
	#[arg(long, global = true, env = "MORTALCOIN_RPC_URL")]
	pub rpc_url: Option<String>,

	/// Address of the MortalCoin smart contract in 0x-prefixed hex format.
	#[arg(long, global = true, env = "MORTALCOIN_CONTRACT_ADDRESS")]
	pub contract_address: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
	Long,
	Short,
}

impl From<DirectionArg> for Direction {
	fn from(arg: DirectionArg) -> Self {
		match arg {
			DirectionArg::Long => Direction::Long,
			DirectionArg::Short => Direction::Short,
		}
	}
}

#[derive(Subcommand)]
pub enum Command {
	/// Create a new game on the blockchain.
	CreateGameCommand {
		/// Private key of the user's Ethereum account.
		#[arg(long, env = "MORTALCOIN_PRIVATE_KEY", hide_env_values = true)]
		private_key: String,

		/// Bet amount in ETH.
		#[arg(long, env = "MORTALCOIN_BET_AMOUNT")]
		bet_amount: String,

		/// Address of the pool.
		#[arg(long, env = "MORTALCOIN_POOL_ADDRESS")]
		pool_address: String,
	},

	/// Join an existing game on the blockchain.
	JoinGameCommand {
		/// Game ID in 0x-prefixed hex format or decimal.
		#[arg(long)]
		game_id: String,

		/// Private key of player1 in 0x-prefixed hex format.
		#[arg(long)]
		player1_privkey: String,

		/// Private key of player2 in 0x-prefixed hex format.
		#[arg(long)]
		player2_privkey: String,

		/// Address of player2's pool in 0x-prefixed hex format.
		#[arg(long)]
		player2_pool: String,

		/// Bet amount in ETH (must match the game's bet amount).
		#[arg(long)]
		bet_amount: String,
	},

	/// Validate a transaction that created a game.
	ValidateCreateGameCommand {
		/// Game ID in 0x-prefixed hex format or decimal.
		#[arg(long)]
		game_id: String,

		/// Transaction hash in 0x-prefixed hex format.
		#[arg(long)]
		tx_hash: String,

		/// Pool address in 0x-prefixed hex format.
		#[arg(long)]
		pool_address: String,
	},

	/// Validate a transaction that joined a game.
	ValidateJoinGameCommand {
		/// Game ID in 0x-prefixed hex format or decimal.
		#[arg(long)]
		game_id: String,

		/// Address of player2's pool in 0x-prefixed hex format.
		#[arg(long)]
		player2_pool: String,

		/// Transaction hash in 0x-prefixed hex format.
		#[arg(long)]
		tx_hash: String,
	},

	/// Post a position for a game.
	PostPositionCommand {
		/// Private key of the player in 0x-prefixed hex format.
		#[arg(long)]
		player_privkey: String,

		/// Private key of the backend in 0x-prefixed hex format.
		#[arg(long)]
		backend_privkey: String,

		/// Game ID in 0x-prefixed hex format or decimal.
		#[arg(long)]
		game_id: String,

		/// Direction of the position (Long or Short).
		#[arg(long, value_enum, ignore_case = true)]
		direction: DirectionArg,

		/// Nonce in 0x-prefixed hex format or decimal. Generated randomly
		/// when omitted.
		#[arg(long)]
		nonce: Option<String>,
	},

	/// Close a posted position, revealing its direction.
	ClosePositionCommand {
		/// Private key of the player in 0x-prefixed hex format.
		#[arg(long)]
		player_privkey: String,

		/// Private key of the backend in 0x-prefixed hex format.
		#[arg(long)]
		backend_privkey: String,

		/// Game ID in 0x-prefixed hex format or decimal.
		#[arg(long)]
		game_id: String,

		/// Direction of the position (Long or Short). Must match the
		/// posted commitment.
		#[arg(long, value_enum, ignore_case = true)]
		direction: DirectionArg,

		/// Nonce used when the position was posted.
		#[arg(long)]
		nonce: String,
	},

	/// Finish a game once its end timestamp has passed.
	FinishGameCommand {
		/// Private key of the caller in 0x-prefixed hex format.
		#[arg(long)]
		private_key: String,

		/// Game ID in 0x-prefixed hex format or decimal.
		#[arg(long)]
		game_id: String,
	},
}
