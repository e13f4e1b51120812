//! Provider configuration and cross-cutting global options.

use serde::{Deserialize, Serialize};

use super::bark::BarkOptions;
use super::kind::ChannelKind;
use super::provider::id_allowed;
use super::smtp::SmtpOptions;
use super::webhook::WebhookOptions;
use crate::utils::DEFAULT_MESSAGE_FORMAT;

fn default_message_format() -> String {
    DEFAULT_MESSAGE_FORMAT.to_string()
}

/// Per-kind configuration records
///
/// A kind is present when its key exists, even with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smtp: Option<Vec<SmtpOptions>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bark: Option<Vec<BarkOptions>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<Vec<WebhookOptions>>,
}

impl ProviderOptions {
    /// Kinds present in the configuration, in registry order
    pub fn kinds(&self) -> Vec<ChannelKind> {
        ChannelKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                ChannelKind::Smtp => self.smtp.is_some(),
                ChannelKind::Bark => self.bark.is_some(),
                ChannelKind::Webhook => self.webhook.is_some(),
            })
            .collect()
    }

    /// Configured record IDs for a kind, in configuration order
    pub fn record_ids(&self, kind: ChannelKind) -> Vec<&str> {
        match kind {
            ChannelKind::Smtp => ids_of(self.smtp.as_deref(), |r| &r.id),
            ChannelKind::Bark => ids_of(self.bark.as_deref(), |r| &r.id),
            ChannelKind::Webhook => ids_of(self.webhook.as_deref(), |r| &r.id),
        }
    }
}

fn ids_of<'a, R>(records: Option<&'a [R]>, id: impl Fn(&'a R) -> &'a String) -> Vec<&'a str> {
    records
        .unwrap_or_default()
        .iter()
        .map(|r| id(r).as_str())
        .collect()
}

/// What `NotifyClient::send` does with per-record delivery failures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log every failure and report success to the caller
    #[default]
    Log,
    /// Log every failure and return them all as an error
    Propagate,
}

impl std::str::FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(ErrorPolicy::Log),
            "propagate" => Ok(ErrorPolicy::Propagate),
            _ => Err(format!(
                "Invalid error policy '{}'. Valid values are: log, propagate",
                s
            )),
        }
    }
}

/// Cross-cutting dispatch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalOptions {
    /// Active channel kinds (empty = all)
    #[serde(default)]
    pub providers: Vec<ChannelKind>,

    /// Active record IDs (empty = all records of active kinds)
    #[serde(default)]
    pub ids: Vec<String>,

    /// Default message format for records without their own
    #[serde(default = "default_message_format")]
    pub message_format: String,

    #[serde(default)]
    pub error_policy: ErrorPolicy,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            ids: Vec::new(),
            message_format: default_message_format(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl GlobalOptions {
    /// Whether `kind` passes the provider allowlist
    pub fn allows_kind(&self, kind: ChannelKind) -> bool {
        self.providers.is_empty() || self.providers.contains(&kind)
    }

    /// Whether a record ID passes the ID allowlist
    pub fn allows_id(&self, id: &str) -> bool {
        id_allowed(&self.ids, id)
    }
}
