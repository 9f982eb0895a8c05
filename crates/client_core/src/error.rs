use std::path::PathBuf;

use shared::error::ApiError;
use thiserror::Error;

/// Failure talking to the remote collection.
///
/// `Display` renders only the human-readable message so it can be shown to
/// the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("{message}")]
    Network { message: String },
    #[error("{message}")]
    Decode { message: String },
}

impl TransportError {
    /// Builds the error for a non-success response, preferring the body's
    /// `message` over the generic status line.
    ///
    /// The generic line is `Error <status>: <reason>`, or just
    /// `Error <status>` when the status has no known reason phrase.
    pub fn from_status(status: u16, reason: Option<&str>, body: Option<ApiError>) -> Self {
        let message = body
            .and_then(ApiError::into_message)
            .unwrap_or_else(|| match reason {
                Some(reason) => format!("Error {status}: {reason}"),
                None => format!("Error {status}"),
            });
        Self::Status { status, message }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Status { message, .. }
            | Self::Network { message }
            | Self::Decode { message } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network { .. } | Self::Decode { .. } => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode {
                message: value.to_string(),
            }
        } else {
            Self::Network {
                message: value.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode {
            message: format!("malformed response body: {value}"),
        }
    }
}

/// Local rejection of form input; never reaches the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Nome e e-mail são obrigatórios")]
    MissingFields,
    #[error("E-mail inválido")]
    InvalidEmail,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid base url '{value}': {source}")]
    BaseUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("base url '{0}' must use http:// or https://")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
