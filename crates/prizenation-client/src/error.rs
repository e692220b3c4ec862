// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::path::PathBuf;

use prizenation_api::ApiError;
use prizenation_storefront::FormErrors;

#[derive(Debug)]
#[non_exhaustive]
pub enum ClientError {
    /// The request never got an HTTP answer.
    Transport(String),
    Api(ApiError),
    Decode { endpoint: String, message: String },
    Io { path: PathBuf, source: std::io::Error },
    /// No session token for an endpoint that needs one.
    Unauthenticated,
    Forbidden(String),
    /// Rejected locally; nothing was sent.
    Validation(FormErrors),
}

impl ClientError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport_error",
            Self::Api(_) => "api_error",
            Self::Decode { .. } => "decode_error",
            Self::Io { .. } => "io_error",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::Validation(_) => "validation_error",
        }
    }

    /// Single-field validation failure.
    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FormErrors::new();
        errors.push(field, message);
        Self::Validation(errors)
    }

    /// What to show the user: the server's detail, a local reason, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(api) => api.user_message(fallback),
            Self::Unauthenticated => "Please login to continue".to_string(),
            Self::Forbidden(message) => message.clone(),
            Self::Validation(errors) => errors
                .iter()
                .map(|(_, message)| message)
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Transport(_) | Self::Decode { .. } | Self::Io { .. } => fallback.to_string(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status,
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "request failed: {message}"),
            Self::Api(api) => write!(f, "{api}"),
            Self::Decode { endpoint, message } => {
                write!(f, "unexpected response from {endpoint}: {message}")
            }
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Unauthenticated => f.write_str("not logged in"),
            Self::Forbidden(message) => f.write_str(message),
            Self::Validation(errors) => write!(f, "{errors}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(api) => Some(api),
            Self::Io { source, .. } => Some(source),
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<FormErrors> for ClientError {
    fn from(value: FormErrors) -> Self {
        Self::Validation(value)
    }
}
