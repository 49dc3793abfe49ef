use std::io::Write;

use ethers::utils::to_checksum;
use tracing::error;

use crate::{deployer::DeploymentResult, error::DeployerError};

pub const SUCCESS_EXIT_CODE: i32 = 0;
pub const FAILURE_EXIT_CODE: i32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Writes the deployed address on success and returns the process exit code.
/// A failure is logged and nothing is written to `out`.
pub fn report(
    outcome: &Result<DeploymentResult, DeployerError>,
    format: OutputFormat,
    out: &mut impl Write,
) -> i32 {
    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            error!("{e}");
            return FAILURE_EXIT_CODE;
        }
    };

    let written = match format {
        // EIP-55 mixed case, as printed by hardhat and etherscan
        OutputFormat::Text => writeln!(
            out,
            "{} deployed to: {}",
            result.contract_name(),
            to_checksum(&result.address(), None)
        ),
        OutputFormat::Json => serde_json::to_string(result)
            .map_err(std::io::Error::from)
            .and_then(|json| writeln!(out, "{json}")),
    };

    match written {
        Ok(()) => SUCCESS_EXIT_CODE,
        Err(e) => {
            error!("could not write deployment result: {e}");
            FAILURE_EXIT_CODE
        }
    }
}
