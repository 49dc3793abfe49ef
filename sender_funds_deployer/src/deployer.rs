use ethers::types::{Address, TxHash};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::{NetworkId, NetworkTable},
    contracts::ContractFactory,
    error::{ConfigurationError, DeployerResult},
};

/// Outcome of one successful deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    contract_name: String,
    network: String,
    chain_id: u64,
    transaction_hash: TxHash,
    address: Address,
}

impl DeploymentResult {
    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn transaction_hash(&self) -> TxHash {
        self.transaction_hash
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

/// Deploys one contract per call to the network selected by id, using the
/// constructor arguments configured for that network.
pub struct Deployer<F> {
    factory: F,
    networks: NetworkTable,
    contract_name: String,
}

impl<F> Deployer<F>
where
    F: ContractFactory,
{
    pub fn new(factory: F, networks: NetworkTable, contract_name: impl Into<String>) -> Self {
        Self {
            factory,
            networks,
            contract_name: contract_name.into(),
        }
    }

    pub fn networks(&self) -> &NetworkTable {
        &self.networks
    }

    /// Fails with a `ConfigurationError` before touching the factory when the
    /// network is unknown or its arguments are invalid. A single transaction
    /// is submitted otherwise; nothing is retried.
    pub async fn deploy(&self, network_id: &NetworkId) -> DeployerResult<DeploymentResult> {
        let network = self.networks.resolve(network_id)?;
        let variant = self.networks.variant();
        let constructor_args = network.constructor_args(variant)?;
        debug!(
            network = %network.name,
            chain_id = network.chain_id,
            ?variant,
            args = ?constructor_args,
            "resolved constructor arguments"
        );

        let chain_id = self.factory.chain_id().await?;
        if chain_id != network.chain_id {
            return Err(ConfigurationError::ChainIdMismatch {
                network: network.name.clone(),
                expected: network.chain_id,
                actual: chain_id,
            }
            .into());
        }

        let transaction_hash = self
            .factory
            .submit(&self.contract_name, &constructor_args)
            .await?;
        info!(
            contract = %self.contract_name,
            network = %network.name,
            tx_hash = ?transaction_hash,
            "deployment submitted"
        );

        let address = self.factory.confirm(transaction_hash).await?;
        info!(contract = %self.contract_name, ?address, "deployment confirmed");

        Ok(DeploymentResult {
            contract_name: self.contract_name.clone(),
            network: network.name.clone(),
            chain_id,
            transaction_hash,
            address,
        })
    }
}


#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    };

    use mockall::predicate::{always, eq};

    use super::{test_utils::*, *};
    use crate::{
        config::{ConstructorVariant, DEFAULT_CONTRACT_NAME},
        contracts::MockContractFactory,
        error::{DeployerError, DeploymentError},
    };

    fn deployer(factory: MockContractFactory) -> Deployer<MockContractFactory> {
        Deployer::new(factory, NetworkTable::default(), DEFAULT_CONTRACT_NAME)
    }

    #[tokio::test]
    async fn reports_the_confirmed_address() {
        let deployed = "0xabcdef0123456789abcdef0123456789abcdef01"
            .parse::<Address>()
            .unwrap();

        let mut factory = MockContractFactory::new();
        factory.expect_chain_id().times(1).returning(|| Ok(5));
        factory
            .expect_submit()
            .with(eq(DEFAULT_CONTRACT_NAME), always())
            .times(1)
            .returning(|_, args| {
                assert_eq!(args.len(), 5);
                Ok(tx_hash(7))
            });
        factory
            .expect_confirm()
            .with(eq(tx_hash(7)))
            .times(1)
            .returning(move |_| Ok(deployed));

        let result = deployer(factory)
            .deploy(&"goerli".parse().unwrap())
            .await
            .unwrap();

        assert_eq!(result.address(), deployed);
        assert_eq!(result.network(), "goerli");
        assert_eq!(result.chain_id(), 5);
        assert_eq!(result.transaction_hash(), tx_hash(7));
        assert_eq!(result.contract_name(), DEFAULT_CONTRACT_NAME);
    }

    #[tokio::test]
    async fn hardhat_gets_the_same_arity_as_live_networks() {
        let mut factory = MockContractFactory::new();
        factory.expect_chain_id().returning(|| Ok(31337));
        factory.expect_submit().times(1).returning(|_, args| {
            assert_eq!(args.len(), 5);
            Ok(tx_hash(1))
        });
        factory.expect_confirm().returning(|_| Ok(address(1)));

        let result = deployer(factory)
            .deploy(&NetworkId::ChainId(31337))
            .await
            .unwrap();

        assert_eq!(result.network(), "hardhat");
    }

    #[tokio::test]
    async fn unparameterized_table_submits_no_args() {
        let mut factory = MockContractFactory::new();
        factory.expect_chain_id().returning(|| Ok(1));
        factory.expect_submit().times(1).returning(|_, args| {
            assert!(args.is_empty());
            Ok(tx_hash(1))
        });
        factory.expect_confirm().returning(|_| Ok(address(1)));

        let deployer = Deployer::new(
            factory,
            NetworkTable::builtin(ConstructorVariant::Unparameterized),
            DEFAULT_CONTRACT_NAME,
        );
        let result = deployer.deploy(&NetworkId::ChainId(1)).await.unwrap();

        assert_eq!(result.network(), "mainnet");
    }

    #[tokio::test]
    async fn unknown_network_fails_before_any_factory_call() {
        // no expectations: any call panics
        let factory = MockContractFactory::new();

        let err = deployer(factory)
            .deploy(&"ropsten".parse().unwrap())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DeployerError::Configuration(ConfigurationError::UnknownNetwork(NetworkId::Name(
                "ropsten".to_owned()
            )))
        );
    }

    #[tokio::test]
    async fn chain_id_mismatch_fails_before_submission() {
        let mut factory = MockContractFactory::new();
        factory.expect_chain_id().times(1).returning(|| Ok(1));
        factory.expect_submit().never();

        let err = deployer(factory)
            .deploy(&NetworkId::Name("goerli".to_owned()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DeployerError::Configuration(ConfigurationError::ChainIdMismatch {
                network: "goerli".to_owned(),
                expected: 5,
                actual: 1,
            })
        );
    }

    #[tokio::test]
    async fn rejected_confirmation_is_a_deployment_error() {
        let mut factory = MockContractFactory::new();
        factory.expect_chain_id().returning(|| Ok(5));
        factory.expect_submit().times(1).returning(|_, _| Ok(tx_hash(3)));
        factory
            .expect_confirm()
            .times(1)
            .returning(|tx_hash| Err(DeploymentError::Reverted(tx_hash)));

        let err = deployer(factory)
            .deploy(&NetworkId::ChainId(5))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DeployerError::Deployment(DeploymentError::Reverted(tx_hash(3)))
        );
    }

    #[tokio::test]
    async fn submit_failure_is_not_retried() {
        let mut factory = MockContractFactory::new();
        factory.expect_chain_id().returning(|| Ok(5));
        factory
            .expect_submit()
            .times(1)
            .returning(|_, _| Err(DeploymentError::Rpc("insufficient funds".to_owned())));
        factory.expect_confirm().never();

        let err = deployer(factory)
            .deploy(&NetworkId::ChainId(5))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeployerError::Deployment(DeploymentError::Rpc(_))
        ));
    }

    #[tokio::test]
    async fn each_call_deploys_a_new_instance() {
        let counter = Arc::new(AtomicU64::new(0));

        let mut factory = MockContractFactory::new();
        factory.expect_chain_id().times(2).returning(|| Ok(5));
        let submitted = counter.clone();
        factory.expect_submit().times(2).returning(move |_, _| {
            Ok(tx_hash(submitted.fetch_add(1, Ordering::SeqCst) + 1))
        });
        factory
            .expect_confirm()
            .times(2)
            .returning(|tx_hash| Ok(Address::from(tx_hash)));

        let deployer = deployer(factory);
        let network_id = NetworkId::ChainId(5);
        let first = deployer.deploy(&network_id).await.unwrap();
        let second = deployer.deploy(&network_id).await.unwrap();

        assert_ne!(first.address(), second.address());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
