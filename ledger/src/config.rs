use std::fmt;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use spkz_common::{config::VERSION, crypto::Address};

// Default directory of the sled database
pub const DIR_PATH: &str = "ledger-data/";

fn default_dir_path() -> String {
    DIR_PATH.to_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Deploys from the hard-coded deployer only.
    ///
    /// Signer addresses are SHA3-256 hashes of ed25519 keys, and no such key
    /// maps to the deployer script hash, so `deploy` on mainnet always fails
    /// with `Unauthorized` from the CLI. Use devnet with `--deployer` to
    /// deploy from a local key.
    #[default]
    Mainnet,
    /// Allows a deployer override for local testing
    Devnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Devnet => write!(f, "devnet"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct SignerArgs {
    /// Hex encoded ed25519 secret key signing the invocation
    #[clap(long)]
    pub signer_key: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate a new ed25519 key and print its address
    Keygen,
    /// Deploy the token (deployer key only, once)
    Deploy {
        #[clap(flatten)]
        signer: SignerArgs,
    },
    Name,
    Symbol,
    Decimals,
    TotalSupply,
    /// Current contract owner
    Owner,
    BalanceOf {
        account: Address,
    },
    Allowance {
        owner: Address,
        spender: Address,
    },
    /// Transfer from the signer's account
    Transfer {
        #[clap(flatten)]
        signer: SignerArgs,
        to: Address,
        amount: u64,
    },
    /// Apply a batch of transfers all-or-nothing
    TransferMulti {
        #[clap(flatten)]
        signer: SignerArgs,
        /// JSON array of [from, to, amount] entries, or @path to a JSON file
        batch: String,
    },
    /// Spend from `from` using the signer's allowance
    TransferFrom {
        #[clap(flatten)]
        signer: SignerArgs,
        from: Address,
        to: Address,
        amount: u64,
    },
    /// Allow `spender` to spend from the signer's account
    Approve {
        #[clap(flatten)]
        signer: SignerArgs,
        spender: Address,
        amount: u64,
    },
    /// Burn from the owner's balance (owner key only)
    Burn {
        #[clap(flatten)]
        signer: SignerArgs,
        amount: u64,
    },
    TransferOwnership {
        #[clap(flatten)]
        signer: SignerArgs,
        new_owner: Address,
    },
    /// Raw dispatch of an operation with positional JSON arguments
    Invoke {
        operation: String,
        /// JSON array of arguments
        #[clap(default_value = "[]")]
        args: String,
        #[clap(long)]
        signer_key: Option<String>,
    },
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[clap(
    version = VERSION,
    about = "Spokkz token ledger: balances, allowances, burn and ownership over a durable key-value store"
)]
pub struct Config {
    /// Network selected for deployment rules
    #[clap(long, value_enum, default_value_t = Network::Mainnet)]
    #[serde(default)]
    pub network: Network,
    /// Set the path to use for the ledger database
    #[clap(long, default_value_t = default_dir_path())]
    #[serde(default = "default_dir_path")]
    pub dir_path: String,
    /// Keep the ledger in memory only, nothing is persisted
    #[clap(long)]
    #[serde(default)]
    pub memory: bool,
    /// Deployer address override (devnet only)
    #[clap(long)]
    #[serde(default)]
    pub deployer: Option<Address>,
    /// Set log level
    #[clap(long, value_enum, default_value_t = LogLevel::Info)]
    #[serde(default)]
    pub log_level: LogLevel,
    /// JSON File to load the configuration from
    #[clap(long)]
    #[serde(skip)]
    #[serde(default)]
    pub config_file: Option<String>,
    /// Generate the template at the `config_file` path
    #[clap(long)]
    #[serde(skip)]
    #[serde(default)]
    pub generate_config_template: bool,
    #[clap(subcommand)]
    #[serde(skip)]
    pub command: Option<Command>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signed_transfer() {
        let config = Config::try_parse_from([
            "spkz_ledger",
            "--network",
            "devnet",
            "--memory",
            "transfer",
            "--signer-key",
            "00",
            "Ac725LuR7wo481zvNmc9jerqCzoCArQjtw",
            "10",
        ])
        .unwrap();
        assert_eq!(config.network, Network::Devnet);
        assert!(config.memory);
        match config.command {
            Some(Command::Transfer { signer, amount, .. }) => {
                assert_eq!(signer.signer_key, "00");
                assert_eq!(amount, 10);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_invalid_address_argument() {
        assert!(Config::try_parse_from(["spkz_ledger", "balance-of", "bogus"]).is_err());
    }

    #[test]
    fn test_config_file_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"network": "devnet"}"#).unwrap();
        assert_eq!(config.network, Network::Devnet);
        assert_eq!(config.dir_path, DIR_PATH);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.command.is_none());
    }
}
