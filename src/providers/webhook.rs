//! Webhook delivery adapter.
//!
//! Sends the message as a JSON body to configured webhook URLs using the
//! shared HTTP client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};

use super::error::{DeliveryError, ProviderError};
use super::kind::ChannelKind;
use super::provider::{ChannelRecord, NotificationProvider, RecordSet};
use crate::transport::{DeliveryTarget, DeliveryTransport, TransportError};

fn default_method() -> String {
    "POST".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// One webhook endpoint configuration record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookOptions {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "webhook_url", alias = "url", default)]
    pub url: String,

    /// HTTP method ("POST", "PUT", etc.)
    #[serde(rename = "webhook_method", alias = "method", default = "default_method")]
    pub method: String,

    #[serde(rename = "webhook_headers", alias = "headers", default)]
    pub headers: HashMap<String, String>,

    /// Message format override for this endpoint
    #[serde(rename = "webhook_format", alias = "format", default)]
    pub format: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for WebhookOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            url: String::new(),
            method: default_method(),
            headers: HashMap::new(),
            format: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl WebhookOptions {
    /// Validates the record
    ///
    /// Checks that:
    /// - url is an http or https URL with a host
    /// - method is a valid HTTP method
    /// - timeout_seconds is greater than 0
    pub fn validate(&self) -> Result<(), ProviderError> {
        self.endpoint()?;
        self.parse_method()?;

        if self.timeout_seconds == 0 {
            return Err(ProviderError::invalid_config(
                &self.id,
                "timeout_seconds",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    fn endpoint(&self) -> Result<Url, ProviderError> {
        let url = Url::parse(&self.url)
            .map_err(|_| ProviderError::invalid_config(&self.id, "url", "is not a valid URL"))?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ProviderError::invalid_config(
                &self.id,
                "url",
                "must use http or https protocol",
            ));
        }
        if url.host_str().is_none() {
            return Err(ProviderError::invalid_config(&self.id, "url", "has no host"));
        }

        Ok(url)
    }

    /// Parses the configured method, case-insensitively
    fn parse_method(&self) -> Result<Method, ProviderError> {
        self.method.to_uppercase().parse().map_err(|_| {
            ProviderError::invalid_config(
                &self.id,
                "method",
                format!("'{}' is not a valid HTTP method", self.method),
            )
        })
    }

    /// Builds the `webhook://` / `webhooks://` descriptor for this record
    pub fn build_url(&self) -> Result<String, TransportError> {
        let endpoint = self
            .endpoint()
            .map_err(|e| TransportError::invalid_target(e.to_string()))?;
        let method = self
            .parse_method()
            .map_err(|e| TransportError::invalid_target(e.to_string()))?;

        let scheme = if endpoint.scheme() == "https" {
            "webhooks"
        } else {
            "webhook"
        };
        let host = endpoint.host_str().unwrap_or_default();
        let authority = match endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let query = match endpoint.query() {
            Some(q) if !q.is_empty() => format!("{}&", q),
            _ => String::new(),
        };

        Ok(format!(
            "{}://{}{}?{}method={}",
            scheme,
            authority,
            endpoint.path(),
            query,
            method
        ))
    }
}

impl ChannelRecord for WebhookOptions {
    fn id(&self) -> &str {
        &self.id
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn delivery_target(&self) -> Result<DeliveryTarget, TransportError> {
        Ok(DeliveryTarget::new(self.build_url()?)
            .with_headers(self.headers.clone())
            .with_timeout(Duration::from_secs(self.timeout_seconds)))
    }
}

/// Webhook delivery adapter
pub struct WebhookProvider {
    records: RecordSet<WebhookOptions>,
}

impl WebhookProvider {
    /// Creates the adapter from the records whose ID passes `ids`
    ///
    /// Fails when a surviving record has an unusable URL, method or timeout.
    pub fn new(
        records: &[WebhookOptions],
        ids: &[String],
        transport: Arc<dyn DeliveryTransport>,
    ) -> Result<Self, ProviderError> {
        let records = RecordSet::new(records, ids, transport);
        for record in records.records() {
            record.validate()?;
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[WebhookOptions] {
        self.records.records()
    }
}

#[async_trait]
impl NotificationProvider for WebhookProvider {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Webhook
    }

    fn record_ids(&self) -> Vec<&str> {
        self.records.ids()
    }

    async fn send(&self, message: &str, fallback_format: &str) -> Result<(), Vec<DeliveryError>> {
        self.records
            .dispatch(ChannelKind::Webhook, message, fallback_format)
            .await
    }
}
