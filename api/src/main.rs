use anyhow::{Context, Result};
use dotenv::dotenv;
use shared::DeployedContracts;

use api::config::AppConfig;
use api::observability::{self, LogFormat};
use api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    observability::init(LogFormat::from_env())?;

    let config = AppConfig::from_env()?;
    let contracts = DeployedContracts::from_path(&config.deployments_path).with_context(|| {
        format!(
            "loading deployed contracts from {}",
            config.deployments_path.display()
        )
    })?;

    let addr = config.listen_addr;
    let state = AppState::new(config, contracts);
    let app = api::app(state);

    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
