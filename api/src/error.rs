use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use shared::{BuildError, EncodingError, ResolutionError};
use uuid::Uuid;

/// Machine-readable error codes returned in the `error` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidRequest,
    InvalidQuery,
    MissingContract,
    MissingFunction,
    ContractNotFound,
    UnknownFunction,
    ArgumentMismatch,
    EncodingFailed,
    RouteNotFound,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "InvalidRequest",
            ErrorCode::InvalidQuery => "InvalidQuery",
            ErrorCode::MissingContract => "MissingContract",
            ErrorCode::MissingFunction => "MissingFunction",
            ErrorCode::ContractNotFound => "ContractNotFound",
            ErrorCode::UnknownFunction => "UnknownFunction",
            ErrorCode::ArgumentMismatch => "ArgumentMismatch",
            ErrorCode::EncodingFailed => "EncodingFailed",
            ErrorCode::RouteNotFound => "RouteNotFound",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ContractNotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,
            ErrorCode::EncodingFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error returned by the txdata handlers
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    code: u16,
    timestamp: String,
    correlation_id: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl From<BuildError> for ApiError {
    fn from(err: BuildError) -> Self {
        let message = err.to_string();
        let code = match &err {
            BuildError::Resolution(ResolutionError::NotFound { .. }) => ErrorCode::ContractNotFound,
            BuildError::Encoding(EncodingError::UnknownFunction { .. }) => ErrorCode::UnknownFunction,
            BuildError::Encoding(EncodingError::ArgumentMismatch { .. }) => {
                ErrorCode::ArgumentMismatch
            }
            BuildError::Encoding(EncodingError::Encode { function, .. }) => {
                tracing::error!(%function, error = %message, "call encoding failed after argument validation");
                ErrorCode::EncodingFailed
            }
        };
        ApiError::new(code, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let correlation_id = Uuid::new_v4().to_string();
        let status = self.status();
        let payload = ErrorResponse {
            error: self.code.as_str(),
            message: self.message,
            code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            correlation_id: correlation_id.clone(),
        };

        let mut response = (status, Json(payload)).into_response();
        if let Ok(value) = HeaderValue::from_str(&correlation_id) {
            response.headers_mut().insert(header::HeaderName::from_static("x-correlation-id"), value);
        }
        response
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_maps_to_not_found() {
        let err: ApiError = BuildError::from(ResolutionError::NotFound {
            contract: "Unknown".to_string(),
            chain_id: 1,
        })
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), ErrorCode::ContractNotFound);
    }

    #[test]
    fn test_encoding_maps_to_bad_request() {
        let unknown: ApiError = BuildError::from(EncodingError::UnknownFunction {
            function: "foo".to_string(),
        })
        .into();
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unknown.code(), ErrorCode::UnknownFunction);

        let mismatch: ApiError = BuildError::from(EncodingError::ArgumentMismatch {
            function: "createLottery".to_string(),
            reason: "createLottery(uint256): argument 0 (duration): expected uint256, got boolean"
                .to_string(),
        })
        .into();
        assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);
        assert!(mismatch.message.contains("createLottery(uint256)"));
    }

    #[test]
    fn test_post_validation_encode_failure_is_internal() {
        let err: ApiError = BuildError::from(EncodingError::Encode {
            function: "createLottery".to_string(),
            reason: "createLottery(uint256): buffer overrun".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), ErrorCode::EncodingFailed);
    }

    #[test]
    fn test_response_carries_correlation_id() {
        let response = ApiError::new(ErrorCode::RouteNotFound, "nothing here").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("x-correlation-id"));
    }
}
