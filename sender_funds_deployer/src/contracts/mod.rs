use async_trait::async_trait;
use ethers::types::{Address, TxHash};
#[cfg(test)]
use mockall::automock;

use crate::error::DeploymentError;

pub mod artifact;
pub mod ethers_factory;

pub use ethers_factory::EthersContractFactory;

/// Deploys compiled contracts by name. The deployer only talks to the chain
/// through this interface. Requires `Send + Sync` so the deployer can be driven
/// from any tokio task.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContractFactory: Send + Sync {
    /// Chain id reported by the connected node.
    async fn chain_id(&self) -> Result<u64, DeploymentError>;

    /// Sends the deployment transaction for `contract_name` with the given
    /// address arguments, without waiting for it to be mined.
    async fn submit(
        &self,
        contract_name: &str,
        constructor_args: &[Address],
    ) -> Result<TxHash, DeploymentError>;

    /// Waits for a submitted deployment and returns the new contract's
    /// address.
    async fn confirm(&self, tx_hash: TxHash) -> Result<Address, DeploymentError>;
}
