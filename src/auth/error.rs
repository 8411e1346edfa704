//! Failure types for the registration and login workflow.

use axum::http::StatusCode;
use thiserror::Error;

/// `InvalidInput` carries the exact validation rule that was violated.
/// `OperationFailed` means the backing store rejected the operation.
///
/// A login that finds no matching user is neither of these: it is reported
/// as an absent result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("{0}")]
    OperationFailed(&'static str),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
