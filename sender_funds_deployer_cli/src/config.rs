use std::{path::PathBuf, time::Duration};

use clap::Parser;
use sender_funds_deployer::{
    config::{ConstructorVariant, NetworkId, NetworkTable, DEFAULT_CONTRACT_NAME},
    contracts::ethers_factory::DEFAULT_CONFIRMATIONS,
    error::ConfigurationError,
    report::OutputFormat,
};

const DEFAULT_RPC_URL: &str = "http://localhost:8545";
const DEFAULT_ARTIFACTS_DIR: &str = "../smart-contracts/artifacts";

/// Deploys a contract with the token addresses configured for the target
/// network. Every option can also be set from the environment or a `.env` file.
#[derive(Parser)]
#[command(name = "deploy-sender-funds", version)]
pub struct DeployConfig {
    /// Target network, by name (e.g. `goerli`) or chain id (e.g. `5`)
    #[arg(long, env = "NETWORK", required_unless_present = "list_networks")]
    pub network: Option<NetworkId>,

    #[arg(long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Mnemonic of the deploying wallet
    #[arg(
        long,
        env = "MNEMONIC",
        hide_env_values = true,
        required_unless_present = "list_networks"
    )]
    pub mnemonic: Option<String>,

    /// Derivation index of the deploying account within the mnemonic
    #[arg(long, env = "ACCOUNT_INDEX", default_value_t = 0)]
    pub account_index: u32,

    /// hardhat artifacts directory
    #[arg(long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    #[arg(long, env = "CONTRACT_NAME", default_value = DEFAULT_CONTRACT_NAME)]
    pub contract_name: String,

    /// Constructor shape of the contract: `token_set` (5 token addresses) or
    /// `unparameterized`
    #[arg(long, env = "CONSTRUCTOR_VARIANT", default_value = "token_set")]
    pub constructor_variant: ConstructorVariant,

    /// JSON file with network entries that replace or extend the built-in table
    #[arg(long, env = "NETWORKS_FILE")]
    pub networks_file: Option<PathBuf>,

    #[arg(long, env = "CONFIRMATIONS", default_value_t = DEFAULT_CONFIRMATIONS)]
    pub confirmations: usize,

    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 2000)]
    pub poll_interval_ms: u64,

    /// Print the deployment result as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the configured networks and exit
    #[arg(long)]
    pub list_networks: bool,
}

impl DeployConfig {
    pub fn network_table(&self) -> Result<NetworkTable, ConfigurationError> {
        let table = NetworkTable::builtin(self.constructor_variant);
        match &self.networks_file {
            Some(path) => table.with_overrides_file(path),
            None => Ok(table),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
