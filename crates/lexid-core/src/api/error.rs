use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback shown when the server provides no usable message.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Categories of gateway errors for consistent error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// HTTP status error (4xx, 5xx)
    Status,
    /// Connection or transport failure
    Network,
    /// Failed to parse the response body
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Status => write!(f, "status"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from the gateway with kind and a user-facing message.
///
/// Every call site receives this uniform shape; nobody downstream inspects
/// raw response bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display; prefers the server message
    pub message: String,
    /// Optional raw response body
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new gateway error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an HTTP status error, preferring the message in the body.
    ///
    /// Servers answer either a JSON object with a "message" field or a bare
    /// JSON string; both map to the same user-facing message.
    pub fn status(status: u16, body: &str) -> Self {
        if let Some(message) = extract_message(body) {
            return Self {
                kind: ApiErrorKind::Status,
                message,
                details: Some(body.to_string()),
            };
        }
        Self {
            kind: ApiErrorKind::Status,
            message: format!("HTTP {status}"),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Creates a transport error with the generic user-facing fallback.
    pub fn network(err: &reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: GENERIC_ERROR.to_string(),
            details: Some(err.to_string()),
        }
    }

    /// Creates a parse error for an unexpected response body.
    pub fn parse(err: &serde_json::Error, body: &str) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: GENERIC_ERROR.to_string(),
            details: Some(format!("{err}: {body}")),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Pulls the server-provided message out of a response body, if any.
fn extract_message(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .map(String::from),
        Ok(Value::String(s)) => Some(s),
        _ => None,
    }
}
