use std::{fmt::Display, path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use ethers::{
    providers::{Middleware, PendingTransaction},
    types::{Address, TransactionRequest, TxHash, U64},
};
use tracing::debug;

use super::{artifact::ContractArtifact, ContractFactory};
use crate::error::DeploymentError;

pub const DEFAULT_CONFIRMATIONS: usize = 1;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Deploys hardhat artifacts through an ethers middleware stack. The
/// middleware is expected to sign (e.g. `SignerMiddleware`).
pub struct EthersContractFactory<M> {
    client: Arc<M>,
    artifacts_dir: PathBuf,
    confirmations: usize,
    poll_interval: Duration,
}

impl<M: Middleware> EthersContractFactory<M> {
    pub fn new(client: Arc<M>, artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            artifacts_dir: artifacts_dir.into(),
            confirmations: DEFAULT_CONFIRMATIONS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations;
        self
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

fn rpc_error(e: impl Display) -> DeploymentError {
    DeploymentError::Rpc(e.to_string())
}

#[async_trait]
impl<M: Middleware> ContractFactory for EthersContractFactory<M> {
    async fn chain_id(&self) -> Result<u64, DeploymentError> {
        let chain_id = self.client.get_chainid().await.map_err(rpc_error)?;
        chain_id
            .try_into()
            .map_err(|_| rpc_error(format!("chain id {chain_id} does not fit in u64")))
    }

    async fn submit(
        &self,
        contract_name: &str,
        constructor_args: &[Address],
    ) -> Result<TxHash, DeploymentError> {
        let artifact = ContractArtifact::load(&self.artifacts_dir, contract_name)?;
        let data = artifact.deployment_data(constructor_args)?;
        debug!(contract_name, bytes = data.len(), "built deployment transaction");

        // no `to`: contract creation
        let tx = TransactionRequest::new().data(data);
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(rpc_error)?;

        Ok(pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<Address, DeploymentError> {
        let receipt = PendingTransaction::new(tx_hash, self.client.provider())
            .confirmations(self.confirmations)
            .interval(self.poll_interval)
            .await
            .map_err(rpc_error)?
            .ok_or(DeploymentError::Dropped(tx_hash))?;

        if receipt.status == Some(U64::zero()) {
            return Err(DeploymentError::Reverted(tx_hash));
        }

        receipt
            .contract_address
            .ok_or(DeploymentError::MissingContractAddress(tx_hash))
    }
}
