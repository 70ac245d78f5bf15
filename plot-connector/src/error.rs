//! Client error types

use thiserror::Error;

use crate::geometry::GeometryError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure, timeout, or undecodable body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Why a save or boundary update did not go through.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Cannot save (missing data).")]
    MissingGeometry,

    #[error("Cannot save (invalid geometry): {0}")]
    InvalidGeometry(#[from] GeometryError),

    #[error(transparent)]
    Store(#[from] ClientError),
}
