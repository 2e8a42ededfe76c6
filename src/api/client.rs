//! HTTP client for the Rick and Morty REST API.
//!
//! One struct per remote service, holding the base URL and a reused
//! `reqwest::Client`. The base URL is overridable so integration tests can
//! point the client at a local mock server.

use std::fmt;

use log::{debug, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::types::{CharacterDto, CharacterPageDto};

/// Public instance of the API.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// Errors surfaced by the HTTP layer.
/// Variants carry enough info to determine retryability (future use).
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// API returned an error response. Retryable if status >= 500 or 429.
    Api { status: u16, message: String },
    /// Failed to parse the response body. Not retryable.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Error body the API attaches to non-success responses,
/// e.g. `{"error": "Character not found"}`.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Typed client for the character endpoints.
pub struct CharacterApi {
    base_url: String,
    client: reqwest::Client,
}

impl CharacterApi {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `base_url` - Optional custom base URL (defaults to the public API)
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    /// Fetches one page of the character list, filtered by name.
    /// The name parameter is always sent, even when empty.
    pub async fn characters(&self, page: u32, name: &str) -> Result<CharacterPageDto, ApiError> {
        debug!("GET /character page={page} name={name:?}");
        let response = self
            .client
            .get(format!("{}/character", self.base_url))
            .query(&[("page", page.to_string()), ("name", name.to_string())])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    /// Fetches a single character by id.
    pub async fn character(&self, id: u32) -> Result<CharacterDto, ApiError> {
        debug!("GET /character/{id}");
        let response = self
            .client
            .get(format!("{}/character/{}", self.base_url, id))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    /// Checks the status and decodes the body. Failure bodies are mined for
    /// the API's own error message, falling back to the raw text.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        debug!("response status: {status}");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            warn!("API error: {} - {}", status.as_u16(), message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("response body did not parse: {e}");
            ApiError::Parse(e.to_string())
        })
    }
}
