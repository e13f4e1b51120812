//! Delivery primitive.
//!
//! Adapters never talk to SMTP servers or HTTP gateways directly: they build a
//! [`DeliveryTarget`] per record and hand it to a [`DeliveryTransport`]
//! together with the rendered message. [`UrlTransport`] is the production
//! implementation and routes on the descriptor scheme:
//!
//! | scheme                  | backend                        |
//! |-------------------------|--------------------------------|
//! | `smtp`                  | `lettre` async SMTP transport  |
//! | `bark`                  | Bark push API via `reqwest`    |
//! | `webhook`, `webhooks`   | HTTP request via `reqwest`     |

mod bark;
mod client;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod smtp;
mod target;
mod webhook;

pub use client::HTTP_CLIENT;
pub use error::TransportError;
pub use target::DeliveryTarget;

use async_trait::async_trait;

/// Hands a message to an external delivery library
///
/// Implementations must be `Send + Sync` so a single transport can be shared
/// by every adapter of a registry.
#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    /// Delivers `message` to the destination described by `target`
    async fn deliver(&self, target: &DeliveryTarget, message: &str) -> Result<(), TransportError>;
}

/// Scheme-routing transport backed by `lettre` and `reqwest`
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlTransport;

impl UrlTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeliveryTransport for UrlTransport {
    async fn deliver(&self, target: &DeliveryTarget, message: &str) -> Result<(), TransportError> {
        tracing::debug!(destination = %target.redacted(), "delivering notification");

        match target.scheme().as_str() {
            "smtp" => smtp::deliver(target, message).await,
            "bark" => bark::deliver(target, message).await,
            "webhook" | "webhooks" => webhook::deliver(target, message).await,
            other => Err(TransportError::UnsupportedScheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let transport = UrlTransport::new();
        let target = DeliveryTarget::new("gopher://example.com/");
        let err = transport.deliver(&target, "hello").await.unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedScheme(s) if s == "gopher"));
    }

    #[tokio::test]
    async fn test_invalid_smtp_target_fails_before_connecting() {
        let transport = UrlTransport::new();
        let target = DeliveryTarget::new("smtp://u:p@smtp.example.com:587/?toAddresses=b@x.com");
        let err = transport.deliver(&target, "hello").await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidTarget { .. }));
    }
}
