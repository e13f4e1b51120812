//! Delivery target descriptor.
//!
//! A descriptor is a URI built from one configuration record for a single
//! send. It is handed to a [`DeliveryTransport`](super::DeliveryTransport)
//! together with the message and then dropped.

use std::fmt;
use std::time::Duration;

use reqwest::Url;

use super::error::TransportError;

/// Ephemeral connection/target representation for one record
#[derive(Clone, PartialEq, Eq)]
pub struct DeliveryTarget {
    uri: String,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl DeliveryTarget {
    /// Creates a descriptor from a URI string
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            headers: Vec::new(),
            timeout: None,
        }
    }

    /// Attaches extra request headers (HTTP-based schemes only)
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets a per-target request timeout (HTTP-based schemes only)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// URI scheme, lowercased; empty when the descriptor has none
    pub fn scheme(&self) -> String {
        self.uri
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .unwrap_or_default()
    }

    /// Parses the descriptor into a structured URL
    pub fn parse(&self) -> Result<Url, TransportError> {
        Url::parse(&self.uri).map_err(|e| TransportError::invalid_target(e.to_string()))
    }

    /// Descriptor with credentials masked, safe for log output
    pub fn redacted(&self) -> String {
        match Url::parse(&self.uri) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.to_string()
            }
            Err(_) => format!("{}://***", self.scheme()),
        }
    }
}

impl fmt::Debug for DeliveryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryTarget")
            .field("uri", &self.redacted())
            .field("headers", &self.headers.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}
