//! Process-wide defaults for generated feeds.
//!
//! Values are read from an optional TOML file and installed once at startup;
//! after that they are read-only. A missing file yields `Config::default()`.
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// Defaults were already installed for this process.
    #[error("Feed defaults are already installed")]
    AlreadyInstalled,
}

// ============================================================================
// Configuration
// ============================================================================

/// Defaults applied to every [`Feed`](crate::Feed) that does not set them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Written as `<generator>` when the feed does not name one.
    pub generator: String,

    /// Written as `<docs>` when the feed does not set it.
    pub docs: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: concat!("rssforge v", env!("CARGO_PKG_VERSION")).to_string(),
            docs: "https://www.rssboard.org/rss-specification".to_string(),
        }
    }
}

/// On-disk layout: the known settings plus whatever else the file holds.
#[derive(Deserialize)]
struct ConfigFile {
    #[serde(flatten)]
    config: Config,
    #[serde(flatten)]
    unknown: toml::Table,
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Reads the defaults from a TOML file.
    ///
    /// A missing or blank file gives the built-in defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(content) = read_capped(path, Self::MAX_FILE_SIZE)? else {
            tracing::debug!(path = %path.display(), "No config file, using built-in defaults");
            return Ok(Self::default());
        };
        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), generator = %config.generator, "Loaded configuration");
        Ok(config)
    }

    /// Parses config text. Keys other than `generator` and `docs` are
    /// reported with a warning and otherwise ignored.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: ConfigFile = toml::from_str(content)?;
        for key in file.unknown.keys() {
            tracing::warn!(key = %key, "Ignoring unknown config key");
        }
        Ok(file.config)
    }
}

/// File contents, or `None` when the file does not exist.
fn read_capped(path: &Path, max: u64) -> Result<Option<String>, ConfigError> {
    let len = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if len > max {
        return Err(ConfigError::TooLarge(format!(
            "{} is {} bytes (max {} bytes)",
            path.display(),
            len,
            max
        )));
    }
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        // Removed between the size check and the read
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Process-wide defaults
// ============================================================================

static DEFAULTS: OnceLock<Config> = OnceLock::new();

/// Installs `config` as the process-wide defaults.
///
/// Must run before the first feed is built; the first call to
/// [`defaults`] freezes the built-in values otherwise.
pub fn install(config: Config) -> Result<(), ConfigError> {
    DEFAULTS
        .set(config)
        .map_err(|_| ConfigError::AlreadyInstalled)
}

/// The installed defaults, or the built-in ones.
pub fn defaults() -> &'static Config {
    DEFAULTS.get_or_init(Config::default)
}

// ============================================================================
// Tests
// ============================================================================
