//! Provider registry: builds the active delivery adapters from configuration.

use std::sync::Arc;

use super::bark::BarkProvider;
use super::error::ProviderError;
use super::kind::ChannelKind;
use super::options::{GlobalOptions, ProviderOptions};
use super::provider::NotificationProvider;
use super::smtp::SmtpProvider;
use super::webhook::WebhookProvider;
use crate::error::{NotifyError, NotifyResult};
use crate::transport::DeliveryTransport;

/// Ordered set of active delivery adapters
pub struct ProviderRegistry {
    providers: Vec<Box<dyn NotificationProvider>>,
}

impl ProviderRegistry {
    /// Builds one adapter per configured kind that passes the provider allowlist
    ///
    /// Record-level filtering by ID happens inside each adapter, so a kind
    /// whose records are all filtered out still yields an (empty) adapter.
    ///
    /// # Errors
    /// Returns `NotifyError::AdapterConstruction` on the first adapter that
    /// fails to build; no partial registry is returned.
    pub fn new(
        options: &ProviderOptions,
        global: &GlobalOptions,
        transport: Arc<dyn DeliveryTransport>,
    ) -> NotifyResult<Self> {
        let mut providers: Vec<Box<dyn NotificationProvider>> = Vec::new();

        if let Some(records) = options.smtp.as_deref() {
            if global.allows_kind(ChannelKind::Smtp) {
                let provider = SmtpProvider::new(records, &global.ids, transport.clone())
                    .map_err(construction_error(ChannelKind::Smtp))?;
                providers.push(Box::new(provider));
            }
        }

        if let Some(records) = options.bark.as_deref() {
            if global.allows_kind(ChannelKind::Bark) {
                let provider = BarkProvider::new(records, &global.ids, transport.clone())
                    .map_err(construction_error(ChannelKind::Bark))?;
                providers.push(Box::new(provider));
            }
        }

        if let Some(records) = options.webhook.as_deref() {
            if global.allows_kind(ChannelKind::Webhook) {
                let provider = WebhookProvider::new(records, &global.ids, transport.clone())
                    .map_err(construction_error(ChannelKind::Webhook))?;
                providers.push(Box::new(provider));
            }
        }

        for provider in &providers {
            tracing::debug!(
                kind = %provider.kind(),
                records = provider.record_ids().len(),
                "registered provider"
            );
        }

        Ok(Self { providers })
    }

    /// Active adapters in registration order
    pub fn providers(&self) -> &[Box<dyn NotificationProvider>] {
        &self.providers
    }

    /// Kinds of the active adapters in registration order
    pub fn kinds(&self) -> Vec<ChannelKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

fn construction_error(kind: ChannelKind) -> impl FnOnce(ProviderError) -> NotifyError {
    move |source| NotifyError::AdapterConstruction { kind, source }
}
