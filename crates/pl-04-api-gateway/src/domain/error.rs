//! Gateway error types and their HTTP mapping.
//!
//! | Error | Status |
//! |-------|--------|
//! | validation, sequencing, invalid block, malformed body | 400 |
//! | unauthorized role | 403 |
//! | unknown contract | 404 |
//! | every peer unreachable during sync | 502 |
//!
//! Bodies are always `{"error": "<message>"}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledger_telemetry::TelemetryError;
use pl_02_contract_workflow::WorkflowError;
use pl_03_peer_sync::SyncError;
use serde::Serialize;
use shared_types::ParseEnumError;
use thiserror::Error;

/// Error returned by a request handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<WorkflowError> for ApiError {
    fn from(error: WorkflowError) -> Self {
        let message = error.to_string();
        match error {
            WorkflowError::ContractNotFound(_) => ApiError::NotFound(message),
            WorkflowError::UnauthorizedRole(_) => ApiError::Forbidden(message),
            WorkflowError::Validation { .. }
            | WorkflowError::DuplicateContract(_)
            | WorkflowError::TerminalState(_)
            | WorkflowError::StepMismatch { .. }
            | WorkflowError::RoleMismatch { .. } => ApiError::BadRequest(message),
            // a block built locally failed to append
            WorkflowError::Chain(_) => ApiError::Internal(message),
        }
    }
}

impl From<SyncError> for ApiError {
    fn from(error: SyncError) -> Self {
        match error {
            SyncError::InvalidBlock(_) => ApiError::BadRequest(error.to_string()),
            SyncError::Unreachable { .. } => ApiError::BadGateway(error.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ParseEnumError> for ApiError {
    fn from(error: ParseEnumError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<TelemetryError> for ApiError {
    fn from(error: TelemetryError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

/// Gateway startup and serving errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
