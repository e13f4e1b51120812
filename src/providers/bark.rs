//! Bark push delivery adapter.
//!
//! Sends push notifications to iOS devices through a Bark server. Bark is an
//! open-source iOS push notification service that supports custom icons,
//! sounds, groups and deep links.
//!
//! Bark API Reference: https://github.com/Finb/Bark

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::error::{DeliveryError, ProviderError};
use super::kind::ChannelKind;
use super::provider::{ChannelRecord, NotificationProvider, RecordSet};
use crate::transport::{DeliveryTarget, DeliveryTransport, TransportError};

const VALID_LEVELS: &[&str] = &["passive", "active", "timeSensitive"];

fn default_server() -> String {
    "https://api.day.app".to_string()
}

/// One Bark device configuration record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarkOptions {
    #[serde(default)]
    pub id: String,

    /// Bark server base URL
    #[serde(rename = "bark_server", alias = "server", default = "default_server")]
    pub server: String,

    #[serde(rename = "bark_device_key", alias = "device_key", default)]
    pub device_key: String,

    /// Message format override for this device
    #[serde(rename = "bark_format", alias = "format", default)]
    pub format: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Interruption level: passive, active or timeSensitive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// URL opened when the notification is tapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for BarkOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            server: default_server(),
            device_key: String::new(),
            format: String::new(),
            title: None,
            sound: None,
            icon: None,
            group: None,
            level: None,
            url: None,
        }
    }
}

impl BarkOptions {
    /// Validates the record
    ///
    /// Checks that:
    /// - server is an http or https URL with a host
    /// - device_key is not empty
    /// - level, if set, is one of passive, active, timeSensitive
    pub fn validate(&self) -> Result<(), ProviderError> {
        self.server_url()?;

        if self.device_key.is_empty() {
            return Err(ProviderError::invalid_config(
                &self.id,
                "device_key",
                "cannot be empty",
            ));
        }

        if let Some(level) = &self.level {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(ProviderError::invalid_config(
                    &self.id,
                    "level",
                    "must be one of: passive, active, timeSensitive",
                ));
            }
        }

        Ok(())
    }

    fn server_url(&self) -> Result<Url, ProviderError> {
        let url = Url::parse(&self.server).map_err(|_| {
            ProviderError::invalid_config(&self.id, "server", "is not a valid URL")
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ProviderError::invalid_config(
                &self.id,
                "server",
                "must use http or https protocol",
            ));
        }
        if url.host_str().is_none() {
            return Err(ProviderError::invalid_config(&self.id, "server", "has no host"));
        }

        Ok(url)
    }

    /// Builds the `bark://` descriptor for this record
    pub fn build_url(&self) -> Result<String, TransportError> {
        let server = self
            .server_url()
            .map_err(|e| TransportError::invalid_target(e.to_string()))?;
        let host = server.host_str().unwrap_or_default();
        let authority = match server.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let path = server.path().trim_end_matches('/');

        let mut uri = format!(
            "bark://:{}@{}{}/?scheme={}",
            urlencoding::encode(&self.device_key),
            authority,
            path,
            server.scheme()
        );

        let optional = [
            ("title", &self.title),
            ("sound", &self.sound),
            ("icon", &self.icon),
            ("group", &self.group),
            ("level", &self.level),
            ("url", &self.url),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                uri.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
            }
        }

        Ok(uri)
    }
}

impl ChannelRecord for BarkOptions {
    fn id(&self) -> &str {
        &self.id
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn delivery_target(&self) -> Result<DeliveryTarget, TransportError> {
        self.build_url().map(DeliveryTarget::new)
    }
}

/// Bark push delivery adapter
pub struct BarkProvider {
    records: RecordSet<BarkOptions>,
}

impl BarkProvider {
    /// Creates the adapter from the records whose ID passes `ids`
    ///
    /// Fails when a surviving record has an unusable server URL, an empty
    /// device key or an unknown level.
    pub fn new(
        records: &[BarkOptions],
        ids: &[String],
        transport: Arc<dyn DeliveryTransport>,
    ) -> Result<Self, ProviderError> {
        let records = RecordSet::new(records, ids, transport);
        for record in records.records() {
            record.validate()?;
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[BarkOptions] {
        self.records.records()
    }
}

#[async_trait]
impl NotificationProvider for BarkProvider {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Bark
    }

    fn record_ids(&self) -> Vec<&str> {
        self.records.ids()
    }

    async fn send(&self, message: &str, fallback_format: &str) -> Result<(), Vec<DeliveryError>> {
        self.records
            .dispatch(ChannelKind::Bark, message, fallback_format)
            .await
    }
}
