// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A non-2xx answer from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub status: Option<u16>,
    /// Decoded `detail`, when the body carried one.
    pub message: Option<String>,
    /// Raw response body, `Null` when it was empty or not JSON.
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(status: Option<u16>, message: Option<String>, details: Value) -> Self {
        Self {
            status,
            message,
            details,
        }
    }

    /// Builds the error from a response status and raw body.
    #[must_use]
    pub fn from_response_body(status: u16, body: &[u8]) -> Self {
        let details: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let message = details.get("detail").and_then(decode_detail);
        Self::new(Some(status), message, details)
    }

    /// Server message when present, otherwise the caller's fallback.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match &self.message {
            Some(m) if !m.is_empty() => m.clone(),
            _ => fallback.to_string(),
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status == Some(403)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.message) {
            (Some(status), Some(message)) => write!(f, "HTTP {status}: {message}"),
            (Some(status), None) => write!(f, "HTTP {status}"),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("request failed"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Decodes a FastAPI `detail` value.
///
/// Strings pass through. Validation arrays become one `loc.path: msg`
/// line per entry. Anything else is rendered as compact JSON.
#[must_use]
pub fn decode_detail(detail: &Value) -> Option<String> {
    match detail {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| {
                    let loc = item
                        .get("loc")
                        .and_then(Value::as_array)
                        .map(|parts| {
                            parts
                                .iter()
                                .map(|p| match p {
                                    Value::String(s) => s.clone(),
                                    other => other.to_string(),
                                })
                                .collect::<Vec<_>>()
                                .join(".")
                        })
                        .unwrap_or_default();
                    let msg = item.get("msg").and_then(Value::as_str).unwrap_or_default();
                    format!("{loc}: {msg}")
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => Some(other.to_string()),
    }
}
