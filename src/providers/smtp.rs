//! SMTP delivery adapter.
//!
//! Each record describes one SMTP account and its recipients. Delivery goes
//! through the shared transport with an `smtp://` descriptor on the STARTTLS
//! submission port.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use lettre::message::Mailbox;
use validator::{Validate, ValidationError};

use super::error::{DeliveryError, ProviderError};
use super::kind::ChannelKind;
use super::provider::{ChannelRecord, NotificationProvider, RecordSet};
use crate::transport::{DeliveryTarget, DeliveryTransport, TransportError};

/// Submission port used for every SMTP descriptor
pub const SMTP_PORT: u16 = 587;

/// One SMTP account configuration record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SmtpOptions {
    #[validate(length(min = 1, message = "id must not be empty"))]
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "smtp_server must not be empty"))]
    #[serde(rename = "smtp_server", alias = "server", default)]
    pub server: String,

    #[serde(rename = "smtp_username", alias = "username", default)]
    pub username: String,

    #[serde(rename = "smtp_password", alias = "password", default)]
    pub password: String,

    #[validate(custom(function = "validate_sender"))]
    #[serde(default)]
    pub from_address: String,

    #[validate(custom(function = "validate_recipients"))]
    #[serde(rename = "smtp_cc", alias = "recipients", alias = "cc", default)]
    pub recipients: Vec<String>,

    /// Message format override for this account
    #[serde(rename = "smtp_format", alias = "format", default)]
    pub format: String,

    #[serde(default)]
    pub subject: String,

    #[serde(rename = "smtp_html", alias = "html", default)]
    pub html: bool,

    #[serde(rename = "smtp_disable_starttls", alias = "disable_starttls", default)]
    pub disable_starttls: bool,
}

/// Addresses are checked with the same parser the SMTP transport uses, so
/// `Name <addr>` mailboxes are accepted here too
fn is_mailbox(address: &str) -> bool {
    address.parse::<Mailbox>().is_ok()
}

fn validate_sender(from_address: &str) -> Result<(), ValidationError> {
    if is_mailbox(from_address) {
        return Ok(());
    }
    Err(ValidationError::new("from_address")
        .with_message("from_address must be a valid e-mail address".into()))
}

fn validate_recipients(recipients: &[String]) -> Result<(), ValidationError> {
    if recipients.is_empty() {
        return Err(ValidationError::new("recipients")
            .with_message("at least one recipient is required".into()));
    }
    if let Some(bad) = recipients.iter().find(|r| !is_mailbox(r)) {
        return Err(ValidationError::new("recipients")
            .with_message(format!("'{}' is not a valid e-mail address", bad).into()));
    }
    Ok(())
}

/// Form query escaping: unreserved bytes pass, space becomes '+'
fn query_escape(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

impl SmtpOptions {
    /// Builds the `smtp://` descriptor for this record
    ///
    /// Only the password is escaped; the remaining fields are embedded as
    /// configured.
    pub fn build_url(&self) -> String {
        format!(
            "smtp://{}:{}@{}:{}/?fromAddress={}&toAddresses={}&subject={}&UseHTML={}&UseStartTLS={}",
            self.username,
            query_escape(&self.password),
            self.server,
            SMTP_PORT,
            self.from_address,
            self.recipients.join(","),
            self.subject,
            self.html,
            !self.disable_starttls,
        )
    }
}

impl ChannelRecord for SmtpOptions {
    fn id(&self) -> &str {
        &self.id
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn delivery_target(&self) -> Result<DeliveryTarget, TransportError> {
        Ok(DeliveryTarget::new(self.build_url()))
    }
}

/// SMTP delivery adapter
pub struct SmtpProvider {
    records: RecordSet<SmtpOptions>,
}

impl SmtpProvider {
    /// Creates the adapter from the records whose ID passes `ids`
    ///
    /// Never fails; the `Result` keeps the constructor contract uniform with
    /// adapters that validate their endpoints.
    pub fn new(
        records: &[SmtpOptions],
        ids: &[String],
        transport: Arc<dyn DeliveryTransport>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            records: RecordSet::new(records, ids, transport),
        })
    }

    pub fn records(&self) -> &[SmtpOptions] {
        self.records.records()
    }

    /// Number of `send` calls so far
    pub fn send_count(&self) -> u64 {
        self.records.send_count()
    }
}

#[async_trait]
impl NotificationProvider for SmtpProvider {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Smtp
    }

    fn record_ids(&self) -> Vec<&str> {
        self.records.ids()
    }

    async fn send(&self, message: &str, fallback_format: &str) -> Result<(), Vec<DeliveryError>> {
        self.records
            .dispatch(ChannelKind::Smtp, message, fallback_format)
            .await
    }
}
