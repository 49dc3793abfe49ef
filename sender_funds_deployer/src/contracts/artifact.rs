use std::{
    io,
    path::{Path, PathBuf},
};

use ethers::{
    abi::{Abi, Token},
    types::{Address, Bytes},
};
use serde::Deserialize;

use crate::error::DeploymentError;

/// The parts of a hardhat compilation artifact needed to deploy a contract.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

/// hardhat layout: `<artifacts>/contracts/<Name>.sol/<Name>.json`
pub fn artifact_path(artifacts_dir: &Path, contract_name: &str) -> PathBuf {
    artifacts_dir
        .join("contracts")
        .join(format!("{contract_name}.sol"))
        .join(format!("{contract_name}.json"))
}

impl ContractArtifact {
    pub fn load(artifacts_dir: &Path, contract_name: &str) -> Result<Self, DeploymentError> {
        let path = artifact_path(artifacts_dir, contract_name);
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DeploymentError::ArtifactNotFound {
                contract: contract_name.to_owned(),
                path: path.display().to_string(),
            },
            _ => DeploymentError::Artifact {
                contract: contract_name.to_owned(),
                reason: e.to_string(),
            },
        })?;

        serde_json::from_str(&content).map_err(|e| DeploymentError::Artifact {
            contract: contract_name.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Creation code followed by the ABI encoded constructor arguments.
    pub fn deployment_data(&self, constructor_args: &[Address]) -> Result<Bytes, DeploymentError> {
        if self.bytecode.is_empty() {
            return Err(DeploymentError::NotDeployable(self.contract_name.clone()));
        }

        let encoding_error = |reason: String| DeploymentError::ConstructorEncoding {
            contract: self.contract_name.clone(),
            reason,
        };

        let tokens: Vec<Token> = constructor_args.iter().copied().map(Token::Address).collect();

        match self.abi.constructor() {
            Some(constructor) => {
                if constructor.inputs.len() != tokens.len() {
                    return Err(encoding_error(format!(
                        "constructor takes {} arguments, {} given",
                        constructor.inputs.len(),
                        tokens.len()
                    )));
                }
                constructor
                    .encode_input(self.bytecode.to_vec(), &tokens)
                    .map(Bytes::from)
                    .map_err(|e| encoding_error(e.to_string()))
            }
            None if tokens.is_empty() => Ok(self.bytecode.clone()),
            None => Err(encoding_error(format!(
                "contract has no constructor, {} arguments given",
                tokens.len()
            ))),
        }
    }
}

#[cfg(test)]
pub mod test_utils {
    use std::path::Path;

    use serde_json::json;

    pub const TEST_BYTECODE: &str = "0x6080604052348015600f57600080fd5b50";

    /// Writes a hardhat style artifact whose constructor takes `arity` addresses.
    pub fn write_artifact(artifacts_dir: &Path, contract_name: &str, arity: usize, bytecode: &str) {
        let inputs: Vec<_> = (0..arity)
            .map(|i| json!({"internalType": "address", "name": format!("token{i}"), "type": "address"}))
            .collect();
        let artifact = json!({
            "_format": "hh-sol-artifact-1",
            "contractName": contract_name,
            "sourceName": format!("contracts/{contract_name}.sol"),
            "abi": [{"inputs": inputs, "stateMutability": "nonpayable", "type": "constructor"}],
            "bytecode": bytecode,
            "deployedBytecode": bytecode,
            "linkReferences": {},
            "deployedLinkReferences": {}
        });

        let path = super::artifact_path(artifacts_dir, contract_name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, artifact.to_string()).unwrap();
    }
}
