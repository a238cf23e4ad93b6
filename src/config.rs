//! Configuration file parser for ~/.config/rss-aggregator/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
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
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory that feed pages and the index page are written under.
    pub output_dir: PathBuf,

    /// Timeout for fetching a single document, in seconds.
    pub fetch_timeout_secs: u64,

    /// Largest document accepted from a file or URL, in bytes.
    pub max_document_bytes: u64,

    /// Validate every item of a feed instead of only the first.
    pub strict_items: bool,

    /// User-Agent header sent with HTTP requests.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            fetch_timeout_secs: 30,
            max_document_bytes: 10 * 1024 * 1024,
            strict_items: false,
            user_agent: concat!("rss-aggregator/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a huge file
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse the TOML content first as a raw table to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "output_dir",
                "fetch_timeout_secs",
                "max_document_bytes",
                "strict_items",
                "user_agent",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            output_dir = %config.output_dir.display(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
