//! Error types for the console service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cryptodevs_types::MintError;
use std::fmt;

/// Service error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error.
    Config(String),
    /// RPC provider could not be constructed.
    Rpc(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Why a console action did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Another state-changing action is still outstanding.
    InFlight,
    Mint(MintError),
}

impl ActionError {
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::InFlight => "in_flight",
            ActionError::Mint(e) => e.kind(),
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::InFlight => write!(f, "another transaction is already in flight"),
            ActionError::Mint(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<MintError> for ActionError {
    fn from(e: MintError) -> Self {
        ActionError::Mint(e)
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let status = match &self {
            ActionError::InFlight => StatusCode::CONFLICT,
            ActionError::Mint(MintError::WrongNetwork { .. }) => StatusCode::MISDIRECTED_REQUEST,
            ActionError::Mint(MintError::UserRejected(_) | MintError::SignerUnavailable) => {
                StatusCode::FORBIDDEN
            }
            ActionError::Mint(MintError::CallReverted(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ActionError::Mint(MintError::TransportFailure(_)) => StatusCode::BAD_GATEWAY,
        };
        let body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "error": self.to_string()
        });
        (status, Json(body)).into_response()
    }
}
