//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use std::sync::Arc;

use super::handlers::{CheckCommandHandler, MessageSource, SendCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{NotifyError, NotifyResult};
use crate::transport::{DeliveryTransport, UrlTransport};

/// Execute a CLI command with the given settings
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Merged and validated settings
///
/// # Errors
/// Returns validation errors for inconsistent arguments and any error from
/// the command handler
pub async fn execute_command(cli: &Cli, settings: Settings) -> NotifyResult<()> {
    execute_with_transport(cli, settings, Arc::new(UrlTransport::new())).await
}

/// Same as [`execute_command`] with an explicit delivery transport
pub async fn execute_with_transport(
    cli: &Cli,
    settings: Settings,
    transport: Arc<dyn DeliveryTransport>,
) -> NotifyResult<()> {
    validate_command_args(cli)?;

    match &cli.command {
        Commands::Send {
            bulk, data, message, ..
        } => {
            let source = MessageSource::select(message, data.as_deref());
            SendCommandHandler::new(settings)
                .with_transport(transport)
                .execute(source, *bulk)
                .await
        }
        Commands::Check { .. } => CheckCommandHandler::new(settings).execute(),
    }
}

fn validate_command_args(cli: &Cli) -> NotifyResult<()> {
    cli.validate().map_err(|reason| NotifyError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::config_merger::ConfigurationMerger;
    use crate::providers::{ProviderOptions, SmtpOptions};
    use crate::transport::mock::MockTransport;
    use clap::Parser;

    fn create_valid_config() -> Settings {
        let mut config = Settings::default();
        config.providers = ProviderOptions {
            smtp: Some(vec![SmtpOptions {
                id: "ops".to_string(),
                server: "smtp.example.com".to_string(),
                from_address: "a@x.com".to_string(),
                recipients: vec!["b@x.com".to_string()],
                ..Default::default()
            }]),
            ..Default::default()
        };
        config
    }

    #[tokio::test]
    async fn test_execute_send_with_message_args() {
        let cli = Cli::try_parse_from(["notify-rs", "send", "disk", "full"]).unwrap();
        let transport = Arc::new(MockTransport::new());

        execute_with_transport(&cli, create_valid_config(), transport.clone())
            .await
            .unwrap();

        assert_eq!(transport.messages(), vec!["disk full"]);
    }

    #[tokio::test]
    async fn test_execute_send_applies_merged_overrides() {
        let cli = Cli::try_parse_from([
            "notify-rs",
            "send",
            "--msg-format",
            "[ops] {{data}}",
            "hello",
        ])
        .unwrap();
        let settings = ConfigurationMerger::new(create_valid_config())
            .merge_cli_args(&cli)
            .unwrap();
        let transport = Arc::new(MockTransport::new());

        execute_with_transport(&cli, settings, transport.clone())
            .await
            .unwrap();

        assert_eq!(transport.messages(), vec!["[ops] hello"]);
    }

    #[tokio::test]
    async fn test_execute_check() {
        let cli = Cli::try_parse_from(["notify-rs", "check"]).unwrap();
        let result = execute_command(&cli, create_valid_config()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_rejected_before_sending() {
        let cli = Cli::try_parse_from(["notify-rs", "send", "--bulk", "hello"]).unwrap();
        let transport = Arc::new(MockTransport::new());

        let err = execute_with_transport(&cli, create_valid_config(), transport.clone())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            NotifyError::Validation { ref field, .. } if field == "cli_arguments"
        ));
        assert!(transport.calls().is_empty());
    }
}
