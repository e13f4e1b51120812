//! Configuration validation logic
//!
//! Validation runs after loading and before any adapter is built, so bad
//! records are reported with their configuration path instead of failing at
//! send time.

use std::collections::HashSet;

use validator::{Validate, ValidationErrors};

use crate::config::error::ConfigError;
use crate::config::settings::{FileSettings, LoggerSettings, Settings};
use crate::logger::VALID_LEVELS;
use crate::providers::{ChannelKind, GlobalOptions, ProviderOptions, check_record_id};

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    /// - At least one output must be enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()?;

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

impl ProviderOptions {
    /// Validate record IDs
    ///
    /// # Validation Rules
    /// - Every record ID is non-empty without surrounding whitespace
    /// - IDs are unique within a kind
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in self.kinds() {
            let mut seen = HashSet::new();
            for (index, id) in self.record_ids(kind).into_iter().enumerate() {
                let field = format!("providers.{}[{}].id", kind, index);
                check_record_id(id)
                    .map_err(|reason| ConfigError::validation(field.as_str(), format!("{}.", reason)))?;
                if !seen.insert(id) {
                    return Err(ConfigError::validation(
                        field,
                        format!("Duplicate {} record ID '{}'.", kind, id),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Validate the contents of the records selected by `global`
    ///
    /// SMTP records need a server, a valid sender and at least one valid
    /// recipient. Records outside either allowlist are never sent to and are
    /// not checked.
    pub fn validate_active(&self, global: &GlobalOptions) -> Result<(), ConfigError> {
        if !global.allows_kind(ChannelKind::Smtp) {
            return Ok(());
        }

        for (index, record) in self.smtp.iter().flatten().enumerate() {
            if !global.allows_id(&record.id) {
                continue;
            }
            record
                .validate()
                .map_err(|e| record_error(&format!("providers.smtp[{}]", index), &e))?;
        }

        Ok(())
    }
}

/// Flattens `validator` errors into one message, fields in sorted order
fn record_error(path: &str, errors: &ValidationErrors) -> ConfigError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();

    ConfigError::validation(path, messages.join("; "))
}

impl Settings {
    /// Validate what does not depend on the final allowlists
    ///
    /// Runs right after loading, before command-line overrides can narrow
    /// the active records.
    pub fn validate_loaded(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.providers.validate()?;
        Ok(())
    }

    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_loaded()?;
        self.providers.validate_active(&self.notify)?;
        Ok(())
    }
}
