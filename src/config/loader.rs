//! Configuration loader for notify-rs
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "NOTIFY_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "NOTIFY_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "NOTIFY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Keys whose environment values are comma-separated lists
const ENV_LIST_KEYS: &[&str] = &["notify.ids", "notify.providers"];

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (required)
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local overrides (optional)
/// 4. `NOTIFY_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Single configuration file; skips layered loading when set
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// This reads environment variables to determine:
    /// - Configuration directory (`NOTIFY_CONFIG_DIR`)
    /// - Specific configuration file (`NOTIFY_CONFIG_FILE`)
    /// - Application environment (`NOTIFY_APP_ENV`)
    ///
    /// # Errors
    ///
    /// Returns an error if both `NOTIFY_CONFIG_DIR` and `NOTIFY_CONFIG_FILE` are set,
    /// as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && dir_var.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "NOTIFY_CONFIG_DIR and NOTIFY_CONFIG_FILE cannot both be set. \
                 Use NOTIFY_CONFIG_DIR for layered configuration or \
                 NOTIFY_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: dir_var
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Load only `path` (plus environment overrides)
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Select the `{environment}.toml` overlay explicitly
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` (layered mode) or the single file is not found
    /// - Configuration parsing fails
    /// - Logger settings or record IDs are invalid
    ///
    /// Record contents are checked by `Settings::validate` once the
    /// allowlists are final.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate_loaded()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        Self::add_env_source(builder)
            .build()
            .map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self.config_dir.join(self.environment.config_file_name());
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.is_file() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
    }

    /// Maps `NOTIFY_*` variables onto configuration keys
    ///
    /// Examples:
    /// - `NOTIFY_LOGGER__LEVEL` -> `logger.level`
    /// - `NOTIFY_NOTIFY__IDS=a,b` -> `notify.ids = ["a", "b"]`
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        let source = ENV_LIST_KEYS.iter().fold(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true)
                .list_separator(","),
            |env, key| env.with_list_parse_key(key),
        );

        builder.add_source(source)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::providers::{ChannelKind, ErrorPolicy};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that touch process environment variables
    pub(crate) static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Sets or removes variables and restores them on drop
    pub(crate) struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        pub(crate) fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        pub(crate) fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        pub(crate) fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }

        /// Clears every variable the loader reads
        pub(crate) fn clean() -> Self {
            let mut env = Self::new();
            for key in [
                CONFIG_DIR_ENV,
                CONFIG_FILE_ENV,
                AppEnvironment::ENV_VAR,
                "NOTIFY_LOGGER__LEVEL",
                "NOTIFY_NOTIFY__IDS",
                "NOTIFY_NOTIFY__PROVIDERS",
                "NOTIFY_NOTIFY__MESSAGE_FORMAT",
                "NOTIFY_NOTIFY__ERROR_POLICY",
            ] {
                env.remove(key);
            }
            env
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // restore in reverse so the first recorded value wins
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_CONFIG: &str = r#"
[application]
name = "test-app"

[logger]
level = "info"

[notify]
message_format = "{{data}}"

[[providers.smtp]]
id = "r1"
smtp_server = "smtp.example.com"
smtp_username = "u"
smtp_password = "p"
from_address = "a@x.com"
smtp_cc = ["b@x.com"]
subject = "Hi"
"#;

    #[test]
    fn test_config_loader_new_default() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("config"));
        assert!(loader.config_file().is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_config_loader_with_config_dir_and_env() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set("NOTIFY_CONFIG_DIR", "/custom/config");
        env.set("NOTIFY_APP_ENV", "prod");

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("/custom/config"));
        assert_eq!(loader.environment(), AppEnvironment::Production);
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set("NOTIFY_CONFIG_DIR", "/custom/config");
        env.set("NOTIFY_CONFIG_FILE", "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains("NOTIFY_CONFIG_DIR"));
                assert!(msg.contains("NOTIFY_CONFIG_FILE"));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set("NOTIFY_CONFIG_DIR", temp_dir.path().to_str().unwrap());

        match ConfigLoader::new().unwrap().load() {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_default_toml_only() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);
        env.set("NOTIFY_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        // staging.toml and local.toml are absent and optional
        env.set("NOTIFY_APP_ENV", "staging");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        assert_eq!(settings.application.name, "test-app");
        assert_eq!(settings.providers.kinds(), vec![ChannelKind::Smtp]);
        let smtp = &settings.providers.smtp.as_ref().unwrap()[0];
        assert_eq!(smtp.server, "smtp.example.com");
        assert_eq!(smtp.recipients, vec!["b@x.com"]);
    }

    #[test]
    fn test_load_full_precedence_chain() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        let development = r#"
[application]
name = "dev-app"

[logger]
level = "debug"

[notify]
message_format = "[dev] {{data}}"
"#;
        let local = r#"
[logger]
level = "warn"
"#;
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_CONFIG),
            ("development.toml", development),
            ("local.toml", local),
        ]);
        env.set("NOTIFY_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("NOTIFY_NOTIFY__ERROR_POLICY", "propagate");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        // environment variable beats every file
        assert_eq!(settings.notify.error_policy, ErrorPolicy::Propagate);
        // local.toml beats development.toml
        assert_eq!(settings.logger.level, "warn");
        // development.toml beats default.toml
        assert_eq!(settings.application.name, "dev-app");
        assert_eq!(settings.notify.message_format, "[dev] {{data}}");
        // default.toml provides the rest
        assert_eq!(settings.providers.record_ids(ChannelKind::Smtp), vec!["r1"]);
    }

    #[test]
    fn test_env_list_overrides() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);
        env.set("NOTIFY_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("NOTIFY_NOTIFY__IDS", "r1,r2");
        env.set("NOTIFY_NOTIFY__PROVIDERS", "smtp,webhook");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        assert_eq!(settings.notify.ids, vec!["r1", "r2"]);
        assert_eq!(
            settings.notify.providers,
            vec![ChannelKind::Smtp, ChannelKind::Webhook]
        );
    }

    #[test]
    fn test_load_single_file_mode() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("single.toml", DEFAULT_CONFIG)]);
        let path = temp_dir.path().join("single.toml");
        env.set("NOTIFY_CONFIG_FILE", path.to_str().unwrap());

        let loader = ConfigLoader::new().unwrap();
        assert_eq!(loader.config_file(), Some(path.as_path()));
        let settings = loader.load().expect("Should load settings");
        assert_eq!(settings.application.name, "test-app");
    }

    #[test]
    fn test_with_config_file_bypasses_layering() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[
            ("custom.toml", DEFAULT_CONFIG),
            ("local.toml", "[application]\nname = \"ignored\"\n"),
        ]);

        let settings = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("custom.toml"))
            .load()
            .expect("Should load settings");

        assert_eq!(settings.application.name, "test-app");
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let record = &DEFAULT_CONFIG[DEFAULT_CONFIG.find("[[providers.smtp]]").unwrap()..];
        // same record twice: duplicate ID within the smtp kind
        let duplicated = format!("{}\n{}", DEFAULT_CONFIG, record);
        let temp_dir = setup_config_dir(&[("default.toml", duplicated.as_str())]);
        env.set("NOTIFY_CONFIG_DIR", temp_dir.path().to_str().unwrap());

        let err = ConfigLoader::new().unwrap().load().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }
}
