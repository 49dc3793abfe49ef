//! Deployer errors

use ethers::types::TxHash;
use thiserror::Error;

use crate::config::NetworkId;

pub type DeployerResult<T> = Result<T, DeployerError>;

/// Raised before any transaction is submitted: the requested network or its
/// constructor arguments cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no deployment configuration for network '{0}'")]
    UnknownNetwork(NetworkId),
    #[error(
        "network '{network}' must supply {expected} constructor arguments, found {actual}"
    )]
    ArityMismatch {
        network: String,
        expected: usize,
        actual: usize,
    },
    #[error("network '{network}' has a malformed token address: '{address}'")]
    MalformedAddress { network: String, address: String },
    #[error("network '{network}' expects chain id {expected}, but the RPC node reports {actual}")]
    ChainIdMismatch {
        network: String,
        expected: u64,
        actual: u64,
    },
    #[error("network '{0}' is configured more than once")]
    DuplicateNetwork(String),
    #[error("unknown constructor variant '{0}' (expected 'token_set' or 'unparameterized')")]
    UnknownVariant(String),
    #[error("could not load networks file: {0}")]
    NetworksFile(String),
}

/// Raised by the contract factory while building, submitting or confirming
/// the deployment transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeploymentError {
    #[error("no compiled artifact for contract '{contract}' at {path}")]
    ArtifactNotFound { contract: String, path: String },
    #[error("invalid artifact for contract '{contract}': {reason}")]
    Artifact { contract: String, reason: String },
    #[error("contract '{0}' has no bytecode (abstract contract or interface?)")]
    NotDeployable(String),
    #[error("could not encode constructor arguments for '{contract}': {reason}")]
    ConstructorEncoding { contract: String, reason: String },
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("deployment transaction {0:?} was dropped from the mempool")]
    Dropped(TxHash),
    #[error("deployment transaction {0:?} reverted")]
    Reverted(TxHash),
    #[error("receipt of deployment transaction {0:?} carries no contract address")]
    MissingContractAddress(TxHash),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeployerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
}
