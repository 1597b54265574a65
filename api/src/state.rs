use contract_abi::AbiEncoder;
use shared::{ChainReference, DeployedContracts, TxRequestBuilder};
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub builder: TxRequestBuilder,
    pub config: Arc<AppConfig>,
    pub supported_chains: Arc<Vec<ChainReference>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, contracts: DeployedContracts) -> Self {
        let supported_chains = contracts.supported_chains();
        if !supported_chains.contains(&config.chain.chain) {
            tracing::warn!(
                chain = %config.chain.chain_name,
                chain_id = config.chain.chain.id(),
                "configured chain has no deployed contracts"
            );
        }

        Self {
            builder: TxRequestBuilder::new(Arc::new(contracts), Arc::new(AbiEncoder::new())),
            config: Arc::new(config),
            supported_chains: Arc::new(supported_chains),
            started_at: Instant::now(),
        }
    }
}
