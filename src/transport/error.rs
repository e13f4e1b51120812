//! Error types for the delivery primitive

use thiserror::Error;

/// Errors raised while handing a message to a delivery library
#[derive(Debug, Error)]
pub enum TransportError {
    /// The delivery target descriptor could not be interpreted
    #[error("invalid delivery target: {reason}")]
    InvalidTarget { reason: String },

    /// No delivery backend handles the descriptor's scheme
    #[error("unsupported delivery scheme '{0}'")]
    UnsupportedScheme(String),

    /// The outbound message could not be assembled
    #[error("invalid message: {0}")]
    Message(String),

    /// SMTP session or submission failure
    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// HTTP request failure (connect, timeout, body)
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status
    #[error("unexpected response status {code}: {body}")]
    Status { code: u16, body: String },

    /// Any other delivery failure
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn invalid_target(reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            reason: reason.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
