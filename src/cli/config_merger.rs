//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use std::path::Path;

use super::parser::{Cli, Commands, Environment};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI overrides on top of file-based configuration
///
/// CLI arguments override configuration file values; the merged result is
/// validated again before use.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration
    ///
    /// # Arguments
    /// * `config_path` - Single file to load instead of the layered directory
    /// * `environment` - Overlay to use instead of `NOTIFY_APP_ENV`
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_config_path(
        config_path: Option<&Path>,
        environment: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(path) = config_path {
            Self::validate_config_file_access(path)?;
            loader = loader.with_config_file(path);
        }
        if let Some(env) = environment {
            loader = loader.with_environment(env.into());
        }

        Ok(Self::new(loader.load()?))
    }

    /// Re-check the file at load time; it may have changed since parsing
    fn validate_config_file_access(path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::validation(
                "config_file",
                format!("Configuration file does not exist: '{}'", path.display()),
            ));
        }

        std::fs::File::open(path).map(|_| ()).map_err(|e| {
            ConfigError::validation(
                "config_file",
                format!("Cannot read configuration file '{}': {}", path.display(), e),
            )
        })
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// # Returns
    /// A new Settings instance with CLI overrides applied
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);
        Self::apply_command_overrides(&mut config, &cli.command);

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    /// Non-empty allowlists from the command line replace configured ones
    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        let (provider, id) = match command {
            Commands::Send {
                provider,
                id,
                msg_format,
                error_policy,
                ..
            } => {
                if let Some(format) = msg_format {
                    config.notify.message_format = format.clone();
                }
                if let Some(policy) = error_policy {
                    config.notify.error_policy = (*policy).into();
                }
                (provider, id)
            }
            Commands::Check { provider, id } => (provider, id),
        };

        if !provider.is_empty() {
            config.notify.providers = provider.clone();
        }
        if !id.is_empty() {
            config.notify.ids = id.clone();
        }
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
