use std::sync::Arc;

use ethers::{
    core::k256::ecdsa::SigningKey,
    middleware::SignerMiddleware,
    providers::{Http, Provider},
    signers::{coins_bip39::English, MnemonicBuilder, Signer, Wallet},
};

use crate::config::DeployConfig;

pub type EtherSigner = SignerMiddleware<Provider<Http>, Wallet<SigningKey>>;

/// Signing client for the account at `config.account_index` of the mnemonic,
/// signing for `chain_id`.
pub fn get_writer_ethers_client(
    config: &DeployConfig,
    mnemonic: &str,
    chain_id: u64,
) -> anyhow::Result<Arc<EtherSigner>> {
    let wallet = MnemonicBuilder::<English>::default()
        .phrase(mnemonic)
        .index(config.account_index)?
        .build()?
        .with_chain_id(chain_id);

    let provider = Provider::<Http>::try_from(config.rpc_url.as_str())?
        .interval(config.poll_interval());
    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}
