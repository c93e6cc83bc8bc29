//! Error types for the SberQR client.

use thiserror::Error;

/// Primary error type for all SberQR operations.
#[derive(Error, Debug)]
pub enum SberQrError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Business-level rejection: 4xx/5xx with a JSON error body. The body
    /// is kept verbatim so callers can inspect `errorCode` and friends.
    #[error("API error (status {status}): {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },

    /// A status the API contract does not describe (redirects, unlisted
    /// 4xx). Surfaced explicitly rather than swallowed.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        status: u16,
        body: serde_json::Value,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-JSON response, or a JSON-labelled body that did not parse.
    /// Usually an HTML error page from an intermediary gateway.
    #[error("Invalid response with content type {content_type}: \"{body}\"")]
    InvalidResponse { content_type: String, body: String },

    /// The OAuth client-credentials exchange failed.
    #[error("Authentication error: {message}")]
    Auth {
        message: String,
        #[source]
        source: Option<Box<SberQrError>>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SberQrError {
    /// Create an authentication error wrapping its cause.
    pub fn auth(message: impl Into<String>, source: SberQrError) -> Self {
        Self::Auth {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this is a transport-level failure (connection error,
    /// non-JSON body) as opposed to a business rejection.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::InvalidResponse { .. })
    }

    /// HTTP status carried by API-level errors, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SberQrError>;
