//! Adapter error types

use thiserror::Error;

use super::kind::ChannelKind;
use crate::transport::TransportError;

/// Adapter construction failure
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A surviving record failed configuration validation
    #[error("invalid configuration for id '{id}': {field} {reason}")]
    InvalidConfig {
        id: String,
        field: String,
        reason: String,
    },
}

impl ProviderError {
    pub fn invalid_config(
        id: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            id: id.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to deliver to a single configuration record
#[derive(Debug, Error)]
#[error("failed to send {kind} notification for id: {id}")]
pub struct DeliveryError {
    /// Channel kind of the failing record
    pub kind: ChannelKind,
    /// Identifier of the failing record
    pub id: String,
    /// Underlying delivery failure
    #[source]
    pub source: TransportError,
}

impl DeliveryError {
    pub fn new(kind: ChannelKind, id: impl Into<String>, source: TransportError) -> Self {
        Self {
            kind,
            id: id.into(),
            source,
        }
    }
}
