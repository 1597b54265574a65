//! Service configuration module
//! Selects the target chain and the deployed-contracts manifest from the environment

use shared::ChainReference;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

const DEFAULT_CHAIN_NAME: &str = "hardhat";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_DEPLOYMENTS_PATH: &str = "contracts/deployedContracts.json";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown chain name: {0}")]
    UnknownChain(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Chain the service builds transactions for by default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_name: String,
    pub chain: ChainReference,
}

impl ChainConfig {
    pub fn from_name(chain_name: &str) -> Result<Self, ConfigError> {
        let chain = ChainReference::from_name(chain_name)
            .ok_or_else(|| ConfigError::UnknownChain(chain_name.to_string()))?;
        Ok(ChainConfig {
            chain_name: chain_name.to_string(),
            chain,
        })
    }
}

/// Full service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub chain: ChainConfig,
    pub base_url: String,
    pub deployments_path: PathBuf,
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chain_name = lookup("CHAIN_NAME").unwrap_or_else(|| DEFAULT_CHAIN_NAME.to_string());
        let chain = ChainConfig::from_name(chain_name.trim())?;

        let base_url = lookup("BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidConfig(format!(
                "BASE_URL must be an http(s) URL: {}",
                base_url
            )));
        }

        let deployments_path = lookup("DEPLOYED_CONTRACTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEPLOYMENTS_PATH));

        let host = lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host.parse::<IpAddr>().map_err(|e| {
            ConfigError::InvalidConfig(format!("Invalid API_HOST: {} ({})", host, e))
        })?;

        let port = match lookup("API_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                ConfigError::InvalidConfig(format!("Invalid API_PORT: {} ({})", raw, e))
            })?,
            None => DEFAULT_PORT,
        };

        info!(
            "Service configuration loaded: chain={} ({}), base_url={}, deployments={}",
            chain.chain_name,
            chain.chain,
            base_url,
            deployments_path.display()
        );

        Ok(AppConfig {
            chain,
            base_url,
            deployments_path,
            listen_addr: SocketAddr::new(host, port),
        })
    }

    /// Public URL of the lottery-creation txdata route
    pub fn txdata_url(&self) -> String {
        format!("{}/frames/lottery/create/txdata", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).expect("Should load with defaults");
        assert_eq!(config.chain.chain_name, "hardhat");
        assert_eq!(config.chain.chain, ChainReference(31337));
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.deployments_path, PathBuf::from("contracts/deployedContracts.json"));
        assert_eq!(config.listen_addr.port(), 3001);
    }

    #[test]
    fn test_chain_selection() {
        let config = load(&[("CHAIN_NAME", "baseSepolia")]).unwrap();
        assert_eq!(config.chain.chain, ChainReference(84532));
    }

    #[test]
    fn test_unknown_chain() {
        let err = load(&[("CHAIN_NAME", "atlantis")]).unwrap_err();
        assert_eq!(err, ConfigError::UnknownChain("atlantis".to_string()));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("API_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&[("BASE_URL", "localhost:3000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_txdata_url_strips_trailing_slash() {
        let config = load(&[("BASE_URL", "https://lottery.example/")]).unwrap();
        assert_eq!(
            config.txdata_url(),
            "https://lottery.example/frames/lottery/create/txdata"
        );
    }
}
