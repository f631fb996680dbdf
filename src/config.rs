use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the SQLite database backing the structured store
    pub database_path: ConfigValue<PathBuf>,
    /// Directory for the flat fallback store
    pub flat_store_dir: ConfigValue<PathBuf>,
    /// Whether to try the structured store at all
    pub structured_store: ConfigValue<bool>,
    /// Root of the remote collection endpoint; empty disables remote sync
    pub remote_base: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    flat_store_dir: Option<PathBuf>,
    structured_store: Option<bool>,
    remote_base: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = Self::default_data_dir();

        // Start with defaults
        let mut database_path =
            ConfigValue::new(data_dir.join("opsdriver.db"), ConfigSource::Default);
        let mut flat_store_dir = ConfigValue::new(data_dir.join("flat"), ConfigSource::Default);
        let mut structured_store = ConfigValue::new(true, ConfigSource::Default);
        let mut remote_base = ConfigValue::new(String::new(), ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(db_path) = file_config.database_path {
                database_path = ConfigValue::new(resolve(&path, db_path), ConfigSource::File);
            }
            if let Some(dir) = file_config.flat_store_dir {
                flat_store_dir = ConfigValue::new(resolve(&path, dir), ConfigSource::File);
            }
            if let Some(enabled) = file_config.structured_store {
                structured_store = ConfigValue::new(enabled, ConfigSource::File);
            }
            if let Some(base) = file_config.remote_base {
                remote_base = ConfigValue::new(base, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(db_path) = std::env::var("OPSDRIVER_DATABASE_PATH") {
            database_path = ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Ok(dir) = std::env::var("OPSDRIVER_FLAT_STORE_DIR") {
            flat_store_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(enabled) = std::env::var("OPSDRIVER_STRUCTURED_STORE") {
            let enabled = !matches!(enabled.to_lowercase().as_str(), "0" | "false" | "no" | "off");
            structured_store = ConfigValue::new(enabled, ConfigSource::Environment);
        }
        if let Ok(base) = std::env::var("OPSDRIVER_REMOTE_BASE") {
            remote_base = ConfigValue::new(base, ConfigSource::Environment);
        }

        Ok(Self {
            database_path,
            flat_store_dir,
            structured_store,
            remote_base,
            config_file,
        })
    }

    /// Remote base with surrounding whitespace and trailing slashes removed,
    /// or `None` when remote sync is disabled.
    pub fn remote_base(&self) -> Option<&str> {
        let base = self.remote_base.value.trim().trim_end_matches('/');
        if base.is_empty() {
            None
        } else {
            Some(base)
        }
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/opsdriver/
    /// - macOS: ~/Library/Application Support/opsdriver/
    /// - Windows: %APPDATA%/opsdriver/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("opsdriver")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/opsdriver/
    /// - macOS: ~/Library/Application Support/opsdriver/
    /// - Windows: %APPDATA%/opsdriver/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("opsdriver")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Resolve relative paths against the config file's directory
fn resolve(config_path: &Path, value: PathBuf) -> PathBuf {
    if value.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&value))
            .unwrap_or(value)
    } else {
        value
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config
            .database_path
            .value
            .to_string_lossy()
            .contains("opsdriver.db"));
        assert_eq!(config.database_path.source, ConfigSource::Default);
        assert!(config.structured_store.value);
        assert_eq!(config.remote_base(), None);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "database_path: /custom/path/ops.sqlite").unwrap();
        writeln!(file, "structured_store: false").unwrap();
        writeln!(file, "remote_base: https://ops.example.com/api/").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(
            config.database_path.value,
            PathBuf::from("/custom/path/ops.sqlite")
        );
        assert_eq!(config.database_path.source, ConfigSource::File);
        assert!(!config.structured_store.value);
        assert_eq!(config.structured_store.source, ConfigSource::File);
        assert_eq!(config.remote_base(), Some("https://ops.example.com/api"));
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "flat_store_dir: data/flat").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(
            config.flat_store_dir.value,
            temp_dir.path().join("data/flat")
        );
        assert_eq!(config.database_path.source, ConfigSource::Default);
    }

    #[test]
    fn test_blank_remote_base_disables_remote() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "remote_base: \"  \"").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.remote_base.source, ConfigSource::File);
        assert_eq!(config.remote_base(), None);
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "remote_base: http://from-file").unwrap();

        std::env::set_var("OPSDRIVER_REMOTE_BASE", "http://from-env");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.remote_base(), Some("http://from-env"));
        assert_eq!(config.remote_base.source, ConfigSource::Environment);

        std::env::remove_var("OPSDRIVER_REMOTE_BASE");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
