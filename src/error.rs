//! Error handling for the Ouvidoria client

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Unified error type for the Ouvidoria client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The API rejected the payload (HTTP 422)
    #[error("Validation failed: {message}")]
    Validation {
        /// Summary message returned by the API
        message: String,
        /// Field-level messages keyed by field name
        errors: HashMap<String, Vec<String>>,
    },

    /// The API rejected the credentials or the session token (HTTP 401/403)
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized {
        /// Response status code
        status: u16,
        /// Message returned by the API
        message: String,
    },

    /// Any other non-success response
    #[error("Request failed with status {status}: {message}")]
    Api {
        /// Response status code
        status: u16,
        /// Message returned by the API
        message: String,
    },

    /// Key-value storage backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The persisted session exists but could not be parsed
    #[error("Stored session is corrupt: {0}")]
    CorruptSession(#[source] serde_json::Error),

    /// Authentication precondition errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Client-side argument errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new invalid input error
    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Build the error for a non-success response from its status and raw body
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let message = ["message", "error", "erro"]
            .iter()
            .find_map(|field| parsed.get(*field).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| body.trim().to_string());
        let errors = parsed.get("errors").map(field_messages).unwrap_or_default();

        match status {
            422 => Error::Validation { message, errors },
            401 | 403 => Error::Unauthorized { status, message },
            _ => Error::Api { status, message },
        }
    }

    /// HTTP status of the response that caused this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Validation { .. } => Some(422),
            Error::Unauthorized { status, .. } | Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Messages for a single field of a validation error
    pub fn field_errors(&self, field: &str) -> &[String] {
        match self {
            Error::Validation { errors, .. } => {
                errors.get(field).map(Vec::as_slice).unwrap_or(&[])
            }
            _ => &[],
        }
    }
}

/// Field messages from either `{"field": ["msg", ..]}` or `[{"field", "message"}, ..]`
fn field_messages(errors: &Value) -> HashMap<String, Vec<String>> {
    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    match errors {
        Value::Object(fields) => {
            for (field, messages) in fields {
                let messages = match messages {
                    Value::Array(items) => items.iter().filter_map(message_text).collect(),
                    other => message_text(other).into_iter().collect(),
                };
                out.insert(field.clone(), messages);
            }
        }
        Value::Array(items) => {
            for item in items {
                let field = ["field", "campo"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(Value::as_str));
                let text = ["message", "mensagem", "msg"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(Value::as_str));
                if let (Some(field), Some(text)) = (field, text) {
                    out.entry(field.to_string()).or_default().push(text.to_string());
                }
            }
        }
        _ => {}
    }
    out
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
