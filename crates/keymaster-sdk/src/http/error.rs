/*
[INPUT]:  Error sources (HTTP status, transport, serialization, URL, config)
[OUTPUT]: Structured error type carrying status code and response text
[POS]:    Error handling layer - unified error type for the whole crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Keymaster client
#[derive(Error, Debug)]
pub enum KeymasterError {
    /// The service answered with a non-success status
    #[error("Error {status}: {message}")]
    Api { status: u16, message: String },

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Successful response without the expected content
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KeymasterError {
    /// Create an API error from status code and raw response text
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        KeymasterError::Api {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            KeymasterError::Api { status, .. } => Some(*status),
            KeymasterError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the service reported 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Message reported by the service.
    ///
    /// Keymaster error bodies look like `{"error": "..."}`; anything else is
    /// returned as the raw response text.
    pub fn server_message(&self) -> Option<String> {
        let KeymasterError::Api { message, .. } = self else {
            return None;
        };

        let parsed = serde_json::from_str::<serde_json::Value>(message).ok();
        let error = parsed
            .as_ref()
            .and_then(|body| body.get("error"))
            .and_then(|value| value.as_str());

        Some(error.unwrap_or(message).to_string())
    }
}

/// Result type alias for Keymaster operations
pub type Result<T> = std::result::Result<T, KeymasterError>;
