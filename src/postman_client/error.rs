//! Classified failures surfaced by the Postman API client.

use thiserror::Error;

/// Coarse category used by callers to decide how to react to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The API rejected what the caller supplied.
    InvalidParams,
    /// Something failed on the server, the transport or the local configuration.
    InternalError,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API key is required. Set POSTMAN_API_KEY or configure the client with a key")]
    MissingApiKey,
    #[error("API request failed: {status} {body}")]
    ClientInput { status: u16, body: String },
    #[error("API request failed: {status}")]
    Internal { status: u16, body: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 | 401 | 403 | 422 => Self::ClientInput { status, body },
            _ => Self::Internal { status, body },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClientInput { .. } | Self::InvalidRequest(_) => ErrorKind::InvalidParams,
            Self::MissingApiKey | Self::Internal { .. } | Self::Transport(_) => {
                ErrorKind::InternalError
            }
        }
    }

    /// Raw response body for failures that carried an HTTP status.
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::ClientInput { body, .. } | Self::Internal { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ClientInput { status, .. } | Self::Internal { status, .. } => Some(*status),
            _ => None,
        }
    }
}
