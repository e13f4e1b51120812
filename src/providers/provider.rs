//! Core delivery adapter trait and the record bookkeeping shared by adapters.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::error::DeliveryError;
use super::kind::ChannelKind;
use crate::transport::{DeliveryTarget, DeliveryTransport, TransportError};
use crate::utils::{render_message, select_format};

/// Trait for delivery adapters (SMTP, Bark, webhook, ...)
///
/// One implementation exists per channel kind. All adapters must be
/// Send + Sync so a registry can be shared across tasks.
///
/// # Example Implementation
/// ```ignore
/// use async_trait::async_trait;
///
/// pub struct SmtpProvider {
///     records: RecordSet<SmtpOptions>,
/// }
///
/// #[async_trait]
/// impl NotificationProvider for SmtpProvider {
///     fn kind(&self) -> ChannelKind {
///         ChannelKind::Smtp
///     }
///
///     fn record_ids(&self) -> Vec<&str> {
///         self.records.ids()
///     }
///
///     async fn send(&self, message: &str, fallback_format: &str) -> Result<(), Vec<DeliveryError>> {
///         self.records.dispatch(ChannelKind::Smtp, message, fallback_format).await
///     }
/// }
/// ```
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Channel kind served by this adapter
    fn kind(&self) -> ChannelKind;

    /// Identifiers of the active records, in configuration order
    fn record_ids(&self) -> Vec<&str>;

    /// Sends a message to every active record
    ///
    /// Every record is attempted once, regardless of earlier failures.
    ///
    /// # Arguments
    /// * `message` - The sanitized message
    /// * `fallback_format` - Format used for records without their own
    ///
    /// # Returns
    /// `Ok(())` if every record succeeded, otherwise the per-record failures
    /// in attempt order
    async fn send(&self, message: &str, fallback_format: &str) -> Result<(), Vec<DeliveryError>>;
}

/// A channel configuration record
pub trait ChannelRecord: Clone + Send + Sync {
    /// Unique identifier within its channel kind
    fn id(&self) -> &str;

    /// Per-record message format override (empty = none)
    fn format(&self) -> &str;

    /// Builds this record's delivery target descriptor
    fn delivery_target(&self) -> Result<DeliveryTarget, TransportError>;
}

/// Returns whether `id` passes the ID allowlist (empty = accept all)
pub fn id_allowed(ids: &[String], id: &str) -> bool {
    ids.is_empty() || ids.iter().any(|allowed| allowed == id)
}

/// Checks the shape every record ID must have, wherever it comes from
///
/// IDs must be non-empty and carry no leading or trailing whitespace; inner
/// whitespace is allowed (`ops team`).
pub fn check_record_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("Record ID must not be empty".to_string());
    }
    if id.trim() != id {
        return Err(format!(
            "Record ID must not start or end with whitespace: '{}'",
            id
        ));
    }
    Ok(())
}

/// Active records of one adapter together with its transport and send counter
pub(crate) struct RecordSet<R> {
    records: Vec<R>,
    transport: Arc<dyn DeliveryTransport>,
    counter: AtomicU64,
}

impl<R: ChannelRecord> RecordSet<R> {
    /// Keeps the records whose ID passes the allowlist, in input order
    pub(crate) fn new(records: &[R], ids: &[String], transport: Arc<dyn DeliveryTransport>) -> Self {
        let records = records
            .iter()
            .filter(|record| id_allowed(ids, record.id()))
            .cloned()
            .collect();

        Self {
            records,
            transport,
            counter: AtomicU64::new(0),
        }
    }

    pub(crate) fn records(&self) -> &[R] {
        &self.records
    }

    pub(crate) fn ids(&self) -> Vec<&str> {
        self.records.iter().map(ChannelRecord::id).collect()
    }

    /// Number of `dispatch` calls so far
    pub(crate) fn send_count(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Delivers `message` to every record, accumulating failures
    pub(crate) async fn dispatch(
        &self,
        kind: ChannelKind,
        message: &str,
        fallback_format: &str,
    ) -> Result<(), Vec<DeliveryError>> {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let mut errors = Vec::new();

        for record in &self.records {
            let format = select_format(fallback_format, record.format());
            let rendered = render_message(format, message, count);

            let result = match record.delivery_target() {
                Ok(target) => self.transport.deliver(&target, &rendered).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => {
                    tracing::info!(kind = %kind, id = record.id(), "{} notification sent for id: {}", kind, record.id());
                }
                Err(source) => errors.push(DeliveryError::new(kind, record.id(), source)),
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
