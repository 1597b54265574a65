use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{StatusCode, Uri},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{CallSpec, ChainReference, UnsignedTransactionRequest};

use crate::{
    error::{ApiError, ApiResult, ErrorCode},
    state::AppState,
};

pub const LOTTERY_DEPLOYER_CONTRACT: &str = "LotteryDeployer";
pub const CREATE_LOTTERY_FUNCTION: &str = "createLottery";
pub const DEFAULT_LOTTERY_DURATION_SECS: u64 = 3600;

fn invalid_txdata_request(err: JsonRejection) -> ApiError {
    ApiError::new(ErrorCode::InvalidRequest, format!("txdata request body: {}", err.body_text()))
}

fn invalid_duration_query(err: QueryRejection) -> ApiError {
    ApiError::new(ErrorCode::InvalidQuery, format!("duration query: {}", err.body_text()))
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let uptime = state.started_at.elapsed().as_secs();
    let now = chrono::Utc::now().to_rfc3339();

    tracing::debug!(uptime_secs = uptime, "health check passed");
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": now,
            "uptime_secs": uptime
        })),
    )
}

pub async fn get_config(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    let supported_chains: Vec<u64> = state.supported_chains.iter().map(|c| c.id()).collect();

    Json(json!({
        "chain_name": config.chain.chain_name,
        "chain_id": config.chain.chain.id(),
        "chain_identifier": config.chain.chain.identifier(state.builder.namespace()),
        "supported_chains": supported_chains,
        "base_url": config.base_url,
        "txdata_url": config.txdata_url(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct DurationQuery {
    pub duration: Option<u64>,
}

/// Frame clients post their own message payload; only `duration` is read.
#[derive(Debug, Default, Deserialize)]
pub struct CreateLotteryBody {
    #[serde(default)]
    pub duration: Option<Value>,
}

/// Transaction data for the "create lottery" frame button.
pub async fn create_lottery_txdata(
    State(state): State<AppState>,
    query: Result<Query<DurationQuery>, QueryRejection>,
    body: Bytes,
) -> ApiResult<Json<UnsignedTransactionRequest>> {
    let Query(query) = query.map_err(invalid_duration_query)?;

    let body: CreateLotteryBody = if body.iter().all(u8::is_ascii_whitespace) {
        CreateLotteryBody::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::new(ErrorCode::InvalidRequest, format!("frame message body: {}", e))
        })?
    };

    let duration = body
        .duration
        .or_else(|| query.duration.map(Value::from))
        .unwrap_or_else(|| Value::from(DEFAULT_LOTTERY_DURATION_SECS));

    let request = state.builder.build(
        LOTTERY_DEPLOYER_CONTRACT,
        state.config.chain.chain,
        CallSpec::new(CREATE_LOTTERY_FUNCTION, vec![duration]),
    )?;

    tracing::info!(
        chain_id = state.config.chain.chain.id(),
        to = %request.params.to,
        "create-lottery transaction data served"
    );
    Ok(Json(request))
}

#[derive(Debug, Deserialize)]
pub struct TxDataRequest {
    pub contract: String,
    pub chain_id: Option<u64>,
    pub function: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Transaction data for an arbitrary registered contract call.
pub async fn build_txdata(
    State(state): State<AppState>,
    payload: Result<Json<TxDataRequest>, JsonRejection>,
) -> ApiResult<Json<UnsignedTransactionRequest>> {
    let Json(req) = payload.map_err(invalid_txdata_request)?;

    if req.contract.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::MissingContract, "contract is required"));
    }
    if req.function.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::MissingFunction, "function is required"));
    }

    let chain = req
        .chain_id
        .map(ChainReference)
        .unwrap_or(state.config.chain.chain);

    let request = state
        .builder
        .build(&req.contract, chain, CallSpec::new(req.function, req.args))?;
    Ok(Json(request))
}

pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::new(ErrorCode::RouteNotFound, format!("No route for {}", uri.path()))
}
