//! Contract lookup by (name, chain).
//!
//! [`DeployedContracts`] is the in-memory registry built from the JSON manifest
//! the contract deployment tooling writes after each deploy:
//!
//! ```json
//! { "31337": { "LotteryDeployer": { "address": "0x…", "abi": [ … ] } } }
//! ```
//!
//! Extra keys in an entry (e.g. `inheritedFunctions`) are ignored.

use std::collections::BTreeMap;
use std::path::Path;

use alloy_json_abi::JsonAbi;
use alloy_primitives::Address;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{RegistryLoadError, ResolutionError};
use crate::models::{ChainReference, ContractReference};

/// Resolves a contract name on a chain to its address and ABI.
///
/// Implementations must be side-effect free from the caller's point of view.
pub trait ContractRegistry: Send + Sync {
    fn resolve(
        &self,
        contract_name: &str,
        chain: ChainReference,
    ) -> Result<ContractReference, ResolutionError>;
}

#[derive(Debug, Deserialize)]
struct DeploymentEntry {
    address: String,
    abi: JsonAbi,
}

/// Registry of contracts deployed per chain
#[derive(Debug, Clone, Default)]
pub struct DeployedContracts {
    chains: BTreeMap<ChainReference, BTreeMap<String, ContractReference>>,
}

impl DeployedContracts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, RegistryLoadError> {
        let raw: BTreeMap<String, BTreeMap<String, DeploymentEntry>> = serde_json::from_str(json)?;
        let mut registry = Self::new();

        for (chain_key, contracts) in raw {
            let chain_id = chain_key
                .trim()
                .parse::<u64>()
                .map_err(|_| RegistryLoadError::InvalidChainId(chain_key.clone()))?;

            for (name, entry) in contracts {
                let address = entry.address.parse::<Address>().map_err(|_| {
                    RegistryLoadError::InvalidAddress {
                        contract: name.clone(),
                        chain_id,
                        address: entry.address.clone(),
                    }
                })?;
                registry.insert(ChainReference(chain_id), name, address, entry.abi);
            }
        }

        Ok(registry)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegistryLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json_str(&json)?;

        info!(
            "Deployed contracts loaded: path={}, chains={:?}",
            path.display(),
            registry.supported_chains()
        );

        Ok(registry)
    }

    pub fn insert(
        &mut self,
        chain: ChainReference,
        name: impl Into<String>,
        address: Address,
        abi: JsonAbi,
    ) {
        let name = name.into();
        debug!(contract = %name, chain_id = chain.id(), %address, "registering deployed contract");
        self.chains.entry(chain).or_default().insert(
            name.clone(),
            ContractReference { name, address, abi },
        );
    }

    pub fn supported_chains(&self) -> Vec<ChainReference> {
        self.chains.keys().copied().collect()
    }

    pub fn contracts_on(&self, chain: ChainReference) -> Vec<&str> {
        self.chains
            .get(&chain)
            .map(|contracts| contracts.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl ContractRegistry for DeployedContracts {
    fn resolve(
        &self,
        contract_name: &str,
        chain: ChainReference,
    ) -> Result<ContractReference, ResolutionError> {
        self.chains
            .get(&chain)
            .and_then(|contracts| contracts.get(contract_name))
            .cloned()
            .ok_or_else(|| ResolutionError::NotFound {
                contract: contract_name.to_string(),
                chain_id: chain.id(),
            })
    }
}
