use std::path::PathBuf;

use thiserror::Error;

/// The requested contract is not known on the requested chain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("contract {contract} is not deployed on chain {chain_id}")]
    NotFound { contract: String, chain_id: u64 },
}

/// The call could not be turned into call data for the resolved ABI
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("function {function} is not present in the contract ABI")]
    UnknownFunction { function: String },
    #[error("arguments do not match {function}: {reason}")]
    ArgumentMismatch { function: String, reason: String },
    #[error("failed to encode call to {function}: {reason}")]
    Encode { function: String, reason: String },
}

/// Failure of a single build, tagged with the stage that produced it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("resolution failed: {0}")]
    Resolution(#[from] ResolutionError),
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),
}

impl BuildError {
    pub fn stage(&self) -> &'static str {
        match self {
            BuildError::Resolution(_) => "resolution",
            BuildError::Encoding(_) => "encoding",
        }
    }
}

#[derive(Error, Debug)]
pub enum RegistryLoadError {
    #[error("failed to read deployed contracts from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid deployed contracts manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid chain id key: {0}")]
    InvalidChainId(String),
    #[error("invalid address for {contract} on chain {chain_id}: {address}")]
    InvalidAddress {
        contract: String,
        chain_id: u64,
        address: String,
    },
}
