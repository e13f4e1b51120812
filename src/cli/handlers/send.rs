//! Send command handler
//!
//! Reads the message input, splits it into notifications and hands each one
//! to a [`NotifyClient`].

use std::path::Path;
use std::sync::Arc;

use tokio::io::AsyncReadExt;

use crate::client::NotifyClient;
use crate::config::settings::Settings;
use crate::error::{NotifyError, NotifyResult};
use crate::transport::{DeliveryTransport, UrlTransport};

/// Where the message text comes from
#[derive(Debug, Clone, Copy)]
pub enum MessageSource<'a> {
    /// Positional arguments, joined with spaces
    Args(&'a [String]),
    File(&'a Path),
    Stdin,
}

impl<'a> MessageSource<'a> {
    /// Picks arguments first, then the data file, then standard input
    pub fn select(message: &'a [String], data: Option<&'a Path>) -> Self {
        match (message.is_empty(), data) {
            (false, _) => MessageSource::Args(message),
            (true, Some(path)) => MessageSource::File(path),
            (true, None) => MessageSource::Stdin,
        }
    }

    pub async fn read(self) -> NotifyResult<String> {
        match self {
            MessageSource::Args(words) => Ok(words.join(" ")),
            MessageSource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            MessageSource::Stdin => {
                let mut input = String::new();
                tokio::io::stdin().read_to_string(&mut input).await?;
                Ok(input)
            }
        }
    }
}

/// Splits input into notifications
///
/// With `bulk` the whole input is one notification; otherwise every
/// non-empty line is its own. Blank input yields nothing.
pub fn split_messages(input: &str, bulk: bool) -> Vec<String> {
    if bulk {
        let trimmed = input.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() {
            return Vec::new();
        }
        return vec![trimmed.to_string()];
    }

    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Handler for the send command
pub struct SendCommandHandler {
    config: Settings,
    transport: Arc<dyn DeliveryTransport>,
}

impl SendCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self {
            config,
            transport: Arc::new(UrlTransport::new()),
        }
    }

    /// Deliver through `transport` instead of the default [`UrlTransport`]
    pub fn with_transport(mut self, transport: Arc<dyn DeliveryTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Execute the send command
    ///
    /// Every notification is sent even when an earlier one failed.
    ///
    /// # Errors
    /// - Adapter construction errors
    /// - Input read errors
    /// - `NotifyError::Delivery` with all failures, under the propagate policy
    pub async fn execute(&self, source: MessageSource<'_>, bulk: bool) -> NotifyResult<()> {
        let client = NotifyClient::with_transport(
            &self.config.providers,
            self.config.notify.clone(),
            self.transport.clone(),
        )?;

        let messages = split_messages(&source.read().await?, bulk);
        if messages.is_empty() {
            tracing::warn!("no message to send");
            return Ok(());
        }

        let mut failures = Vec::new();
        for message in &messages {
            match client.send(message).await {
                Ok(()) => {}
                Err(NotifyError::Delivery(errors)) => failures.extend(errors),
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            messages = messages.len(),
            failures = failures.len(),
            "send finished"
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotifyError::Delivery(failures))
        }
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
