//! Application configuration.
//!
//! Layered with `figment`, later layers winning:
//!
//! ```text
//! defaults
//!   < <config_dir>/ygo-deckdb/config.toml   (if present)
//!   < --config <file>                       (must exist)
//!   < YGO_DECKDB_* environment variables    (sections split on "__")
//!   < command-line flags                    (applied by the binary)
//! ```
//!
//! e.g. `YGO_DECKDB_RESOLUTION__SIMILARITY_THRESHOLD=0.8`.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::client::cache::DEFAULT_MEMORY_CAPACITY;
use crate::core::client::ygoprodeck::{DEFAULT_BASE_URL, DEFAULT_RATE_LIMIT, DEFAULT_TIMEOUT};
use crate::core::render::{OutputFormat, DEFAULT_TITLE};
use crate::core::resolution::DEFAULT_SIMILARITY_THRESHOLD;

pub const APP_DIR: &str = "ygo-deckdb";
pub const ENV_PREFIX: &str = "YGO_DECKDB_";
pub const DEFAULT_OUTPUT_PATH: &str = "yugioh_card_database.md";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Extract(#[from] figment::Error),

    #[error("similarity_threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("max_workers must be at least 1")]
    InvalidWorkers,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub resolution: ResolutionConfig,
    pub client: ClientConfig,
    pub output: OutputConfig,
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Minimum similarity for the fuzzy stages, in `(0, 1]`.
    pub similarity_threshold: f64,
}

/// Card data source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// On-disk response cache.
    pub cache_dir: PathBuf,
    pub use_cache: bool,
    /// Minimum delay between API requests.
    pub rate_limit_ms: u64,
    pub timeout_secs: u64,
    /// Responses kept in memory in front of the disk cache.
    pub memory_cache_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub path: PathBuf,
    pub title: String,
    /// Name corrections report; not written when unset.
    pub corrections_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Card resolutions in flight at once.
    pub max_workers: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: default_cache_dir(),
            use_cache: true,
            rate_limit_ms: DEFAULT_RATE_LIMIT.as_millis() as u64,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            memory_cache_capacity: DEFAULT_MEMORY_CAPACITY,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            title: DEFAULT_TITLE.to_string(),
            corrections_path: None,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
        }
    }
}

/// Half the available cores, at least one.
pub fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() / 2)
        .unwrap_or(1)
        .max(1)
}

fn default_cache_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR).join("cache"))
        .unwrap_or_else(|| PathBuf::from(".ygo-deckdb").join("cache"))
}

impl AppConfig {
    /// Default user config file location.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Every layer below the command line, unextracted.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = Self::user_config_path() {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate the layered configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NotFound` if `explicit` names a missing file
    /// - `ConfigError::Extract` on malformed TOML or mistyped values
    /// - validation errors, see [`validate`](Self::validate)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = Self::layered(explicit)?;
        config.validate()?;
        Ok(config)
    }

    /// Extract the layered configuration without validating it, so that
    /// command-line flags can still fix a bad value before [`validate`](Self::validate).
    pub fn layered(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
        }

        let config: AppConfig = Self::figment(explicit).extract()?;
        debug!(?config, "Loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.resolution.similarity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if self.runtime.max_workers == 0 {
            return Err(ConfigError::InvalidWorkers);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.resolution.similarity_threshold, 0.7);
        assert_eq!(config.client.base_url, "https://db.ygoprodeck.com/api/v7");
        assert!(config.client.use_cache);
        assert_eq!(config.client.rate_limit_ms, 100);
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.output.format, OutputFormat::Markdown);
        assert_eq!(config.output.path, PathBuf::from("yugioh_card_database.md"));
        assert!(config.output.corrections_path.is_none());
        assert!(config.runtime.max_workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.resolution.similarity_threshold = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreshold(_))));

        let mut config = AppConfig::default();
        config.runtime.max_workers = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWorkers)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "deckdb.toml",
                r#"
                [resolution]
                similarity_threshold = 0.8

                [output]
                format = "json"
                title = "Snake-Eye Deck"
                "#,
            )?;
            jail.set_env("YGO_DECKDB_OUTPUT__FORMAT", "csv");
            jail.set_env("YGO_DECKDB_RUNTIME__MAX_WORKERS", "3");

            let config: AppConfig = AppConfig::figment(Some(Path::new("deckdb.toml"))).extract()?;
            assert_eq!(config.resolution.similarity_threshold, 0.8);
            assert_eq!(config.output.title, "Snake-Eye Deck");
            assert_eq!(config.output.format, OutputFormat::Csv);
            assert_eq!(config.runtime.max_workers, 3);
            assert!(config.client.use_cache);
            Ok(())
        });
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }
}
