use thiserror::Error;

use crate::config::error::ConfigError;
use crate::providers::{ChannelKind, DeliveryError, ProviderError};

/// Crate-wide error type
///
/// Construction-time failures are fatal and surface from
/// `NotifyClient::new`; send-time failures only surface when the
/// error policy is `propagate`.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// A delivery adapter could not be constructed
    #[error("could not create {kind} provider client")]
    AdapterConstruction {
        kind: ChannelKind,
        #[source]
        source: ProviderError,
    },

    /// One or more records failed during a send, in attempt order
    #[error("{} notification deliveries failed", .0.len())]
    Delivery(Vec<DeliveryError>),

    /// Configuration loading or validation failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading message input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid command-line usage
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl NotifyError {
    /// Per-record failures carried by a `Delivery` error
    pub fn delivery_errors(&self) -> &[DeliveryError] {
        match self {
            NotifyError::Delivery(errors) => errors,
            _ => &[],
        }
    }
}

/// Type alias for Result with NotifyError to simplify function signatures
pub type NotifyResult<T> = Result<T, NotifyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;

    #[test]
    fn test_adapter_construction_display() {
        let err = NotifyError::AdapterConstruction {
            kind: ChannelKind::Bark,
            source: ProviderError::invalid_config("phone", "device_key", "cannot be empty"),
        };
        assert_eq!(err.to_string(), "could not create bark provider client");
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            "invalid configuration for id 'phone': device_key cannot be empty"
        );
    }

    #[test]
    fn test_delivery_errors_accessor() {
        let err = NotifyError::Delivery(vec![DeliveryError::new(
            ChannelKind::Smtp,
            "r1",
            TransportError::other("connection refused"),
        )]);
        assert_eq!(err.to_string(), "1 notification deliveries failed");
        assert_eq!(err.delivery_errors().len(), 1);
        assert_eq!(err.delivery_errors()[0].id, "r1");

        let other = NotifyError::Validation {
            field: "message".to_string(),
            reason: "empty".to_string(),
        };
        assert!(other.delivery_errors().is_empty());
    }
}
