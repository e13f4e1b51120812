//! Check command handler
//!
//! Builds every delivery adapter without sending and reports what is active.

use std::io::Write;

use crate::client::NotifyClient;
use crate::config::settings::Settings;
use crate::error::NotifyResult;

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the check command, printing to stdout
    pub fn execute(&self) -> NotifyResult<()> {
        self.execute_to(&mut std::io::stdout().lock())
    }

    /// Execute the check command, printing to `out`
    ///
    /// # Errors
    /// - Adapter construction errors
    /// - Write errors on `out`
    pub fn execute_to(&self, out: &mut impl Write) -> NotifyResult<()> {
        let client = NotifyClient::new(&self.config.providers, self.config.notify.clone())?;

        writeln!(out, "✓ Configuration is valid")?;

        if client.providers().is_empty() {
            writeln!(out, "No notification channels are active")?;
            return Ok(());
        }

        for provider in client.providers() {
            let ids = provider.record_ids();
            if ids.is_empty() {
                writeln!(out, "✓ {}: no matching records", provider.kind())?;
            } else {
                writeln!(out, "✓ {}: {}", provider.kind(), ids.join(", "))?;
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
