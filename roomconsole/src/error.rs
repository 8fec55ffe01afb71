use std::collections::BTreeMap;

use thiserror::Error;

/// Coarse classification of a failed request.
///
/// Every resource reports its failures through these six kinds, and callers
/// react to the kind rather than to individual status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    ValidationFailed,
    ServerError,
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("unauthenticated")]
    Unauthorized,

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    /// 428: the entity changed on the server since it was last read.
    #[error("stale entity: {message}")]
    Conflict {
        message: String,
        new_model: serde_json::Value,
    },

    #[error("validation failed: {message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    #[error("HTTP error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("page {requested} out of range (last page is {last})")]
    PageOutOfRange { requested: u32, last: u32 },

    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl ConsoleError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ConsoleError::Unauthorized => FailureKind::Unauthorized,
            ConsoleError::Forbidden { .. } => FailureKind::Forbidden,
            ConsoleError::NotFound { .. } => FailureKind::NotFound,
            ConsoleError::Conflict { .. } => FailureKind::Conflict,
            ConsoleError::Validation { .. } => FailureKind::ValidationFailed,
            _ => FailureKind::ServerError,
        }
    }

    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConsoleError::Unauthorized => Some(401),
            ConsoleError::Forbidden { .. } => Some(403),
            ConsoleError::NotFound { .. } => Some(404),
            ConsoleError::Validation { .. } => Some(422),
            ConsoleError::Conflict { .. } => Some(428),
            ConsoleError::Server { status, .. } => Some(*status),
            ConsoleError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
