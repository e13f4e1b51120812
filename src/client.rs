//! Dispatch client.
//!
//! [`NotifyClient`] owns the provider registry and fans each message out to
//! every active adapter.

use std::sync::Arc;

use crate::error::{NotifyError, NotifyResult};
use crate::providers::{
    DeliveryError, ErrorPolicy, GlobalOptions, NotificationProvider, ProviderOptions,
    ProviderRegistry,
};
use crate::transport::{DeliveryTransport, UrlTransport};
use crate::utils::strip_ansi;

/// Sends notifications through every active delivery adapter
pub struct NotifyClient {
    registry: ProviderRegistry,
    options: GlobalOptions,
}

impl NotifyClient {
    /// Builds a client backed by the default [`UrlTransport`]
    ///
    /// # Errors
    /// Returns `NotifyError::AdapterConstruction` if any active adapter
    /// cannot be built.
    pub fn new(providers: &ProviderOptions, options: GlobalOptions) -> NotifyResult<Self> {
        Self::with_transport(providers, options, Arc::new(UrlTransport::new()))
    }

    /// Builds a client that delivers through `transport`
    pub fn with_transport(
        providers: &ProviderOptions,
        options: GlobalOptions,
        transport: Arc<dyn DeliveryTransport>,
    ) -> NotifyResult<Self> {
        let registry = ProviderRegistry::new(providers, &options, transport)?;

        tracing::debug!(
            providers = registry.len(),
            error_policy = ?options.error_policy,
            "notify client ready"
        );

        Ok(Self { registry, options })
    }

    /// Active adapters in registration order
    pub fn providers(&self) -> &[Box<dyn NotificationProvider>] {
        self.registry.providers()
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    /// Sends `message` to every record of every active adapter
    ///
    /// ANSI escape sequences are stripped first. Every adapter is attempted
    /// even when earlier ones fail, and each failure is logged.
    ///
    /// # Returns
    /// With [`ErrorPolicy::Log`] always `Ok(())`. With
    /// [`ErrorPolicy::Propagate`] a `NotifyError::Delivery` carrying every
    /// failure in attempt order.
    pub async fn send(&self, message: &str) -> NotifyResult<()> {
        let message = strip_ansi(message);
        let mut failures: Vec<DeliveryError> = Vec::new();

        for provider in self.registry.providers() {
            if let Err(errors) = provider.send(&message, &self.options.message_format).await {
                for e in &errors {
                    tracing::error!(
                        kind = %e.kind,
                        id = %e.id,
                        cause = %e.source,
                        "{}: {}",
                        e,
                        e.source
                    );
                }
                failures.extend(errors);
            }
        }

        match self.options.error_policy {
            ErrorPolicy::Propagate if !failures.is_empty() => Err(NotifyError::Delivery(failures)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{BarkOptions, ChannelKind, SmtpOptions, WebhookOptions};
    use crate::transport::mock::MockTransport;

    fn smtp(id: &str, server: &str) -> SmtpOptions {
        SmtpOptions {
            id: id.to_string(),
            server: server.to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            from_address: "a@x.com".to_string(),
            recipients: vec!["b@x.com".to_string()],
            subject: "Hi".to_string(),
            ..Default::default()
        }
    }

    fn providers() -> ProviderOptions {
        ProviderOptions {
            smtp: Some(vec![smtp("r1", "smtp.example.com")]),
            bark: Some(vec![BarkOptions {
                id: "phone".to_string(),
                device_key: "key".to_string(),
                ..Default::default()
            }]),
            webhook: Some(vec![WebhookOptions {
                id: "hook".to_string(),
                url: "https://hooks.example.com/notify".to_string(),
                ..Default::default()
            }]),
        }
    }

    fn client(
        providers: &ProviderOptions,
        options: GlobalOptions,
        transport: &Arc<MockTransport>,
    ) -> NotifyClient {
        NotifyClient::with_transport(providers, options, transport.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_scenario_single_smtp_record() {
        let transport = Arc::new(MockTransport::new());
        let providers = ProviderOptions {
            smtp: Some(vec![smtp("r1", "smtp.example.com")]),
            ..Default::default()
        };
        let client = client(&providers, GlobalOptions::default(), &transport);

        client.send("disk full").await.unwrap();

        assert_eq!(
            transport.calls(),
            vec![(
                "smtp://u:p@smtp.example.com:587/?fromAddress=a@x.com&toAddresses=b@x.com&subject=Hi&UseHTML=false&UseStartTLS=true"
                    .to_string(),
                "disk full".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_ansi_is_stripped_for_every_adapter() {
        let transport = Arc::new(MockTransport::new());
        let client = client(&providers(), GlobalOptions::default(), &transport);

        client
            .send("\x1b[31merror:\x1b[0m disk \x1b]0;title\x07full")
            .await
            .unwrap();

        assert_eq!(transport.messages(), vec!["error: disk full"; 3]);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_fan_out_under_log_policy() {
        let transport = Arc::new(MockTransport::failing_on(&["smtp.example.com"]));
        let client = client(&providers(), GlobalOptions::default(), &transport);

        assert!(client.send("hello").await.is_ok());

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[1].0.starts_with("bark://"));
        assert!(calls[2].0.starts_with("webhooks://"));
    }

    #[tokio::test]
    async fn test_failures_are_returned_under_propagate_policy() {
        let transport = Arc::new(MockTransport::failing_on(&["smtp.example.com", "hooks.example.com"]));
        let options = GlobalOptions {
            error_policy: ErrorPolicy::Propagate,
            ..Default::default()
        };
        let client = client(&providers(), options, &transport);

        let err = client.send("hello").await.unwrap_err();

        let failed: Vec<(ChannelKind, &str)> = err
            .delivery_errors()
            .iter()
            .map(|e| (e.kind, e.id.as_str()))
            .collect();
        assert_eq!(
            failed,
            vec![(ChannelKind::Smtp, "r1"), (ChannelKind::Webhook, "hook")]
        );
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_propagate_policy_without_failures_is_ok() {
        let transport = Arc::new(MockTransport::new());
        let options = GlobalOptions {
            error_policy: ErrorPolicy::Propagate,
            ..Default::default()
        };
        let client = client(&providers(), options, &transport);

        assert!(client.send("hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_unmatched_id_allowlist_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let providers = ProviderOptions {
            smtp: Some(vec![smtp("r1", "smtp.example.com")]),
            ..Default::default()
        };
        let options = GlobalOptions {
            ids: vec!["r2".to_string()],
            error_policy: ErrorPolicy::Propagate,
            ..Default::default()
        };
        let client = client(&providers, options, &transport);

        assert_eq!(client.providers().len(), 1);
        client.send("hello").await.unwrap();
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_global_message_format_applies() {
        let transport = Arc::new(MockTransport::new());
        let providers = ProviderOptions {
            smtp: Some(vec![smtp("r1", "smtp.example.com")]),
            ..Default::default()
        };
        let options = GlobalOptions {
            message_format: "[alert #{{count}}] {{data}}".to_string(),
            ..Default::default()
        };
        let client = client(&providers, options, &transport);

        client.send("one").await.unwrap();
        client.send("two").await.unwrap();

        assert_eq!(transport.messages(), vec!["[alert #1] one", "[alert #2] two"]);
    }

    #[test]
    fn test_construction_failure_is_surfaced() {
        let providers = ProviderOptions {
            webhook: Some(vec![WebhookOptions {
                id: "hook".to_string(),
                url: "ftp://example.com".to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let result = NotifyClient::new(&providers, GlobalOptions::default());
        assert!(matches!(
            result,
            Err(NotifyError::AdapterConstruction {
                kind: ChannelKind::Webhook,
                ..
            })
        ));
    }
}
