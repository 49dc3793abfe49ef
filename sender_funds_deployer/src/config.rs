use std::{convert::Infallible, fmt, path::Path, str::FromStr};

use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

pub const DEFAULT_CONTRACT_NAME: &str = "SenderFundsContract";

const GOERLI_USDT: &str = "0x79c950c7446b234a6ad53b908fbf342b01c4d446";

// order: USDT, USDC, DAI, WETH, WBTC
const MAINNET_TOKENS: [&str; 5] = [
    "0xdAC17F958D2ee523a2206206994597C13D831ec7",
    "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
    "0x6B175474E89094C44Da98b954EedeAC495271d0F",
    "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
    "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599",
];

const POLYGON_TOKENS: [&str; 5] = [
    "0xc2132D05D31c914a87C6611C10748AEb04B58e8F",
    "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174",
    "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063",
    "0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619",
    "0x1BFD67037B42Cf73acF2047067bd4F2C47D9BfD6",
];

// mock tokens deployed by the first hardhat account at nonces 0..5
const HARDHAT_MOCK_TOKENS: [&str; 5] = [
    "0x5FbDB2315678afecb367f032d93F642f64180aa3",
    "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512",
    "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0",
    "0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9",
    "0xDc64a140Aa3E981100a9becA4E685f962f0cF6C9",
];

/// Identifies the network a deployment targets: either its chain id or one of
/// the configured network names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NetworkId {
    ChainId(u64),
    Name(String),
}

impl FromStr for NetworkId {
    type Err = Infallible;

    /// all-digit input is a chain id, anything else a (case-insensitive) name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u64>() {
            Ok(chain_id) => NetworkId::ChainId(chain_id),
            Err(_) => NetworkId::Name(s.to_lowercase()),
        })
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkId::ChainId(chain_id) => write!(f, "{chain_id}"),
            NetworkId::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Shape of the constructor of the contract being deployed. Every network in a
/// table supplies arguments for the same variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorVariant {
    /// `constructor()`
    Unparameterized,
    /// `constructor(address,address,address,address,address)`
    #[default]
    TokenSet,
}

impl ConstructorVariant {
    pub fn arity(&self) -> usize {
        match self {
            ConstructorVariant::Unparameterized => 0,
            ConstructorVariant::TokenSet => 5,
        }
    }
}

impl FromStr for ConstructorVariant {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "unparameterized" => Ok(ConstructorVariant::Unparameterized),
            "token_set" => Ok(ConstructorVariant::TokenSet),
            _ => Err(ConfigurationError::UnknownVariant(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    #[serde(default)]
    pub token_addresses: Vec<String>,
}

impl NetworkConfig {
    fn new(name: &str, chain_id: u64, tokens: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            chain_id,
            token_addresses: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn matches(&self, network_id: &NetworkId) -> bool {
        match network_id {
            NetworkId::ChainId(chain_id) => self.chain_id == *chain_id,
            NetworkId::Name(name) => self.name.eq_ignore_ascii_case(name),
        }
    }

    /// The constructor arguments for this network, checked against the
    /// variant's arity.
    pub fn constructor_args(
        &self,
        variant: ConstructorVariant,
    ) -> Result<Vec<Address>, ConfigurationError> {
        let expected = variant.arity();
        if self.token_addresses.len() != expected {
            return Err(ConfigurationError::ArityMismatch {
                network: self.name.clone(),
                expected,
                actual: self.token_addresses.len(),
            });
        }

        self.token_addresses
            .iter()
            .map(|address| parse_token_address(&self.name, address))
            .collect()
    }
}

/// Accepts only `0x` followed by exactly 40 hex digits. The EIP-55 checksum
/// is not enforced; lowercase addresses are common in deployment scripts.
pub fn parse_token_address(network: &str, address: &str) -> Result<Address, ConfigurationError> {
    let malformed = || ConfigurationError::MalformedAddress {
        network: network.to_owned(),
        address: address.to_owned(),
    };

    let hex = address.strip_prefix("0x").ok_or_else(malformed)?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    hex.parse().map_err(|_| malformed())
}

/// The built-in networks, with the arguments of the given constructor variant.
pub fn builtin_networks(variant: ConstructorVariant) -> Vec<NetworkConfig> {
    match variant {
        ConstructorVariant::TokenSet => vec![
            NetworkConfig::new("mainnet", 1, &MAINNET_TOKENS),
            NetworkConfig::new("goerli", 5, &[GOERLI_USDT; 5]),
            NetworkConfig::new("polygon", 137, &POLYGON_TOKENS),
            NetworkConfig::new("hardhat", 31337, &HARDHAT_MOCK_TOKENS),
        ],
        ConstructorVariant::Unparameterized => vec![
            NetworkConfig::new("mainnet", 1, &[]),
            NetworkConfig::new("goerli", 5, &[]),
            NetworkConfig::new("polygon", 137, &[]),
            NetworkConfig::new("hardhat", 31337, &[]),
        ],
    }
}

/// Every network a deployment may target, with its constructor arguments for
/// one constructor variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkTable {
    variant: ConstructorVariant,
    networks: Vec<NetworkConfig>,
}

impl Default for NetworkTable {
    fn default() -> Self {
        Self::builtin(ConstructorVariant::default())
    }
}

impl NetworkTable {
    pub fn builtin(variant: ConstructorVariant) -> Self {
        Self {
            variant,
            networks: builtin_networks(variant),
        }
    }

    /// Validates every entry against `variant`, and rejects entries sharing a
    /// name or chain id.
    pub fn new(
        variant: ConstructorVariant,
        networks: Vec<NetworkConfig>,
    ) -> Result<Self, ConfigurationError> {
        for (idx, network) in networks.iter().enumerate() {
            network.constructor_args(variant)?;

            let clash = networks[..idx].iter().any(|other| {
                other.name.eq_ignore_ascii_case(&network.name) || other.chain_id == network.chain_id
            });
            if clash {
                return Err(ConfigurationError::DuplicateNetwork(network.name.clone()));
            }
        }

        Ok(Self { variant, networks })
    }

    pub fn variant(&self) -> ConstructorVariant {
        self.variant
    }

    pub fn networks(&self) -> &[NetworkConfig] {
        &self.networks
    }

    pub fn resolve(&self, network_id: &NetworkId) -> Result<&NetworkConfig, ConfigurationError> {
        self.networks
            .iter()
            .find(|network| network.matches(network_id))
            .ok_or_else(|| ConfigurationError::UnknownNetwork(network_id.clone()))
    }

    /// Entries of `overrides` replace the entry of the same name, or are
    /// appended.
    pub fn with_overrides(self, overrides: Vec<NetworkConfig>) -> Result<Self, ConfigurationError> {
        let mut networks = self.networks;
        for network in overrides {
            match networks
                .iter_mut()
                .find(|existing| existing.name.eq_ignore_ascii_case(&network.name))
            {
                Some(existing) => *existing = network,
                None => networks.push(network),
            }
        }

        Self::new(self.variant, networks)
    }

    /// Applies overrides read from a JSON file holding an array of network
    /// entries.
    pub fn with_overrides_file(self, path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::NetworksFile(format!("{}: {e}", path.display()))
        })?;
        let overrides: Vec<NetworkConfig> = serde_json::from_str(&content).map_err(|e| {
            ConfigurationError::NetworksFile(format!("{}: {e}", path.display()))
        })?;

        self.with_overrides(overrides)
    }
}
