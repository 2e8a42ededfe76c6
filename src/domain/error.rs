//! Failure taxonomy shared by every layer above the HTTP client. Nothing
//! propagates uncaught; every fallible operation returns one of these.

use std::fmt;

use crate::api::ApiError;

/// Broad classification a screen can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never reached the backend. Retryable.
    Network,
    /// The backend knows no such character.
    NotFound,
    /// The payload arrived but did not make sense.
    Parse,
    /// Any other backend answer.
    Unknown,
}

/// A structured failure outcome: what went wrong plus a human-readable cause.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CharacterError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for CharacterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Network => write!(f, "network error: {}", self.message),
            ErrorKind::NotFound => write!(f, "not found: {}", self.message),
            ErrorKind::Parse => write!(f, "parse error: {}", self.message),
            ErrorKind::Unknown => write!(f, "error: {}", self.message),
        }
    }
}

impl std::error::Error for CharacterError {}

impl From<ApiError> for CharacterError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(msg) => CharacterError::new(ErrorKind::Network, msg),
            ApiError::Api {
                status: 404,
                message,
            } => CharacterError::new(ErrorKind::NotFound, message),
            ApiError::Api { status, message } => {
                CharacterError::new(ErrorKind::Unknown, format!("HTTP {status}: {message}"))
            }
            ApiError::Parse(msg) => CharacterError::new(ErrorKind::Parse, msg),
        }
    }
}
