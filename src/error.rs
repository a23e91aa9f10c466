//! Error handling for the pipeline admin client

use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

pub use pipeline_admin_listview::ListViewError;

/// Unified error type for the pipeline admin client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Non-success response from the backend
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// Input rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// List view input errors
    #[error("List view error: {0}")]
    ListView(#[from] ListViewError),

    /// General errors
    #[error("{0}")]
    General(String),
}

/// FastAPI error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl Error {
    /// Build an API error from a non-success status and its response body
    ///
    /// The message is the `detail` field when the body carries one, otherwise
    /// the raw body, otherwise a generic status line.
    pub fn api(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                detail: serde_json::Value::String(detail),
            }) => detail,
            Ok(ErrorBody { detail }) => detail.to_string(),
            Err(_) if !body.trim().is_empty() => body.trim().to_string(),
            Err(_) => format!("HTTP error: {}", status.as_u16()),
        };
        Error::Api { status, message }
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// Whether the error was raised before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
