use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persistent defaults for values the user would otherwise pass on every
/// invocation. Flags and `MORTALCOIN_*` environment variables always take
/// precedence over this file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
	pub network: NetworkConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
	/// Default Ethereum RPC endpoint.
	pub rpc_url: Option<String>,
	/// Default MortalCoin contract address.
	pub contract_address: Option<String>,
}

impl Config {
	/// Directory where CLI state is stored (~/.mortalcoin/).
	pub fn dir() -> PathBuf {
		dirs::home_dir()
			.expect("could not determine home directory")
			.join(".mortalcoin")
	}

	/// Path to the config file.
	pub fn path() -> PathBuf {
		Self::dir().join("config.toml")
	}

	/// Load config from disk, falling back to defaults if no file exists.
	pub fn load() -> anyhow::Result<Self> {
		let path = Self::path();
		if path.exists() {
			let content = std::fs::read_to_string(&path)?;
			Ok(toml::from_str(&content)?)
		} else {
			Ok(Self::default())
		}
	}
}
