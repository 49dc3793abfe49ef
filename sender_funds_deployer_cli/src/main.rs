pub mod config;
pub mod ethers_client;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use sender_funds_deployer::{
    config::NetworkTable,
    contracts::EthersContractFactory,
    deployer::Deployer,
    report::{report, FAILURE_EXIT_CODE, SUCCESS_EXIT_CODE},
};
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::{config::DeployConfig, ethers_client::get_writer_ethers_client};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = DeployConfig::parse();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialise logging: {e}");
    }

    let code = match run(config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            FAILURE_EXIT_CODE
        }
    };
    std::process::exit(code);
}

/// logs go to stderr, stdout only carries the deployment result
fn init_tracing() -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("info".to_owned());
    let tracing_sub = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(tracing_sub)?;
    Ok(())
}

async fn run(config: DeployConfig) -> anyhow::Result<i32> {
    let networks = config.network_table()?;
    let format = config.output_format();

    if config.list_networks {
        print_networks(&networks, &mut std::io::stdout().lock())?;
        return Ok(SUCCESS_EXIT_CODE);
    }

    let network_id = config.network.clone().context("no network given")?;
    let mnemonic = config.mnemonic.as_deref().context("no mnemonic given")?;

    // unknown networks fail here, before connecting to any node
    let chain_id = match networks.resolve(&network_id) {
        Ok(network) => network.chain_id,
        Err(e) => return Ok(report(&Err(e.into()), format, &mut std::io::stdout())),
    };

    let client = get_writer_ethers_client(&config, mnemonic, chain_id)?;
    let factory = EthersContractFactory::new(client, &config.artifacts_dir)
        .confirmations(config.confirmations)
        .poll_interval(config.poll_interval());
    let deployer = Deployer::new(factory, networks, &config.contract_name);

    let outcome = deployer.deploy(&network_id).await;
    Ok(report(&outcome, format, &mut std::io::stdout()))
}

fn print_networks(networks: &NetworkTable, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "constructor variant: {:?}", networks.variant())?;
    for network in networks.networks() {
        writeln!(
            out,
            "{} (chain id {}): [{}]",
            network.name,
            network.chain_id,
            network.token_addresses.join(", ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_builtin_network() {
        let mut out = Vec::new();
        print_networks(&NetworkTable::default(), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "constructor variant: TokenSet");
        assert!(lines[2].starts_with("goerli (chain id 5): [0x79c950c7446b234a6ad53b908fbf342b01c4d446, "));
        assert!(lines[4].starts_with("hardhat (chain id 31337): [0x5FbDB2315678afecb367f032d93F642f64180aa3, "));
    }
}
