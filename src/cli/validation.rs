//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::fs;
use std::path::PathBuf;

use crate::providers::{ChannelKind, check_record_id};

/// Validate that a configuration file exists and is readable
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    validate_readable_file(path_str, "Configuration")
}

/// Validate that a message data file exists and is readable
pub fn validate_data_file_path(path_str: &str) -> Result<PathBuf, String> {
    validate_readable_file(path_str, "Data")
}

fn validate_readable_file(path_str: &str, what: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("{} file does not exist: '{}'", what, path_str));
    }

    if !path.is_file() {
        return Err(format!("{} path is not a file: '{}'", what, path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!(
            "Cannot read {} file '{}': {}",
            what.to_lowercase(),
            path_str,
            e
        )),
    }
}

/// Validate a channel kind name (smtp, bark, webhook)
pub fn validate_channel_kind(kind_str: &str) -> Result<ChannelKind, String> {
    kind_str.parse()
}

/// Validate a record ID with the rule configuration files follow
///
/// Surrounding whitespace is trimmed first so `-i "r1, r2"` works.
pub fn validate_record_id(id_str: &str) -> Result<String, String> {
    let id = id_str.trim();
    check_record_id(id)?;
    Ok(id.to_string())
}
