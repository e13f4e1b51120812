//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::providers::{ChannelKind, ErrorPolicy};

/// Send notifications to SMTP, Bark and webhook channels
#[derive(Parser, Debug)]
#[command(name = "notify-rs")]
#[command(about = "Send notifications to SMTP, Bark and webhook channels")]
#[command(long_about = "
notify-rs fans a message out to every configured notification channel.
Channels are grouped by kind (smtp, bark, webhook); each configuration record
is one destination with its own ID. Colour codes are stripped before sending.

EXAMPLES:
    # Send a message to every configured channel
    notify-rs send \"backup finished\"

    # Pipe command output, one notification per line
    ./scan.sh | notify-rs send

    # Send a whole file as a single notification
    notify-rs send --bulk --data report.txt

    # Only use SMTP records with IDs ops and oncall
    notify-rs send -p smtp -i ops,oncall \"disk full\"

    # Fail with exit code 1 if any delivery fails
    notify-rs send --error-policy propagate \"deploy done\"

    # Show which channels and records are active
    notify-rs --config /etc/notify-rs/config.toml check

For more information about configuration options, see the documentation.
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load this TOML file instead of the layered configuration directory.
    /// The file must exist and be readable.
    ///
    /// Example: --config /etc/notify-rs/config.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` overlay is loaded.
    ///
    /// Available values: development (dev), test, staging (stage), production (prod)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Sets the log level to debug. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Sets the log level to error. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a notification
    ///
    /// The message is taken from the positional arguments, else from --data,
    /// else from standard input. Without --bulk every non-empty line is sent
    /// as its own notification.
    ///
    /// Examples:
    ///   notify-rs send "hello"                 # One message to every channel
    ///   notify-rs send -p bark "hello"         # Only Bark records
    ///   tail -n 20 app.log | notify-rs send --bulk
    Send {
        /// Channel kinds to use (comma-separated); replaces the configured allowlist
        #[arg(short, long, value_name = "KIND", value_delimiter = ',', value_parser = super::validation::validate_channel_kind)]
        provider: Vec<ChannelKind>,

        /// Record IDs to use (comma-separated); replaces the configured allowlist
        #[arg(short, long, value_name = "ID", value_delimiter = ',', value_parser = super::validation::validate_record_id)]
        id: Vec<String>,

        /// Message format, e.g. "[alert] {{data}}"
        ///
        /// `{{data}}` is replaced with the message and `{{count}}` with the
        /// per-channel send counter. Records with their own format keep it.
        #[arg(long, value_name = "FORMAT")]
        msg_format: Option<String>,

        /// What to do with delivery failures
        #[arg(long, value_enum)]
        error_policy: Option<ErrorPolicyArg>,

        /// Send the whole input as a single notification
        #[arg(long)]
        bulk: bool,

        /// Read the message from a file instead of standard input
        #[arg(short, long, value_name = "FILE", conflicts_with = "message", value_parser = super::validation::validate_data_file_path)]
        data: Option<PathBuf>,

        /// Message text; words are joined with spaces
        #[arg(value_name = "MESSAGE")]
        message: Vec<String>,
    },
    /// Validate configuration and list active channels
    ///
    /// Builds every delivery adapter without sending anything and prints the
    /// active channel kinds with their record IDs.
    ///
    /// Examples:
    ///   notify-rs check
    ///   notify-rs check -p smtp -i ops
    Check {
        /// Channel kinds to use (comma-separated)
        #[arg(short, long, value_name = "KIND", value_delimiter = ',', value_parser = super::validation::validate_channel_kind)]
        provider: Vec<ChannelKind>,

        /// Record IDs to use (comma-separated)
        #[arg(short, long, value_name = "ID", value_delimiter = ',', value_parser = super::validation::validate_record_id)]
        id: Vec<String>,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Error policy options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorPolicyArg {
    /// Log failures and exit successfully
    #[value(name = "log")]
    Log,
    /// Log failures and exit with an error
    #[value(name = "propagate")]
    Propagate,
}

impl Cli {
    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if let Commands::Send {
            bulk,
            message,
            msg_format,
            ..
        } = &self.command
        {
            if *bulk && !message.is_empty() {
                return Err(
                    "--bulk applies to --data or standard input, not to message arguments"
                        .to_string(),
                );
            }
            if let Some(format) = msg_format
                && !format.is_empty()
                && !format.contains("{{data}}")
            {
                return Err(format!(
                    "Message format '{}' does not contain the {{{{data}}}} placeholder",
                    format
                ));
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        Ok(())
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

impl From<ErrorPolicyArg> for ErrorPolicy {
    fn from(policy: ErrorPolicyArg) -> Self {
        match policy {
            ErrorPolicyArg::Log => ErrorPolicy::Log,
            ErrorPolicyArg::Propagate => ErrorPolicy::Propagate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["notify-rs", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["notify-rs", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["notify-rs"]).is_err());
    }

    #[test]
    fn test_send_command() {
        let cli = Cli::try_parse_from([
            "notify-rs",
            "send",
            "-p",
            "smtp,bark",
            "-i",
            "r1",
            "-i",
            "r2",
            "--msg-format",
            "[x] {{data}}",
            "--error-policy",
            "propagate",
            "disk",
            "full",
        ])
        .unwrap();

        match cli.command {
            Commands::Send {
                provider,
                id,
                msg_format,
                error_policy,
                bulk,
                data,
                message,
            } => {
                assert_eq!(provider, vec![ChannelKind::Smtp, ChannelKind::Bark]);
                assert_eq!(id, vec!["r1", "r2"]);
                assert_eq!(msg_format.as_deref(), Some("[x] {{data}}"));
                assert_eq!(error_policy, Some(ErrorPolicyArg::Propagate));
                assert!(!bulk);
                assert!(data.is_none());
                assert_eq!(message, vec!["disk", "full"]);
            }
            other => panic!("Expected Send command, got {:?}", other),
        }
    }

    #[test]
    fn test_send_rejects_unknown_kind() {
        let err = Cli::try_parse_from(["notify-rs", "send", "-p", "pager", "hi"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_send_data_conflicts_with_message() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        let err = Cli::try_parse_from(["notify-rs", "send", "-d", path, "hello"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_check_command_with_env() {
        let cli = Cli::try_parse_from(["notify-rs", "--env", "prod", "check", "-i", "ops"]).unwrap();
        assert_eq!(cli.env, Some(Environment::Production));
        match cli.command {
            Commands::Check { provider, id } => {
                assert!(provider.is_empty());
                assert_eq!(id, vec!["ops"]);
            }
            other => panic!("Expected Check command, got {:?}", other),
        }
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["notify-rs", "--verbose", "--quiet", "check"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_validate_bulk_with_message_args() {
        let cli = Cli::try_parse_from(["notify-rs", "send", "--bulk", "hello"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_validate_format_without_placeholder() {
        let cli =
            Cli::try_parse_from(["notify-rs", "send", "--msg-format", "static", "hi"]).unwrap();
        let err = cli.validate().unwrap_err();
        assert!(err.contains("{{data}}"));

        let cli = Cli::try_parse_from(["notify-rs", "send", "--msg-format", "", "hi"]).unwrap();
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_error_policy_conversion() {
        assert_eq!(ErrorPolicy::from(ErrorPolicyArg::Log), ErrorPolicy::Log);
        assert_eq!(
            ErrorPolicy::from(ErrorPolicyArg::Propagate),
            ErrorPolicy::Propagate
        );
    }
}
