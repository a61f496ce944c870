// Error types for startup and request handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use thiserror::Error;

/// Startup configuration failures. Any of these aborts the process before
/// a listener is bound.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing NIM_API_KEY")]
    MissingApiKey,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failures of a single chat completion call.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Request body could not be read as a chat completion request
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    /// Upstream could not be reached (refused, reset, timed out)
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status}")]
    Upstream { status: u16, body: Value },

    /// Upstream answered 2xx but the body was not a chat completion
    #[error("Malformed upstream response: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Build an upstream error from a raw response body. JSON bodies are kept
    /// structured, anything else is carried as a string.
    pub fn upstream(status: u16, raw: &str) -> Self {
        let body = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        Self::Upstream { status, body }
    }

    /// Diagnostic payload for the caller: the upstream body when there is
    /// one, otherwise the local error message.
    pub fn detail(&self) -> Value {
        match self {
            ProxyError::Upstream { body, .. } if !body.is_null() => body.clone(),
            other => Value::String(other.to_string()),
        }
    }

    /// Every failure kind collapses into one 500 "Proxy error" body.
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "message": "Proxy error",
                "detail": self.detail()
            }
        })
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.detail());
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.to_json())).into_response()
    }
}
