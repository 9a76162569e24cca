//! Configuration for the feed generator.
//!
//! The built-in defaults are the site's static configuration table. An optional
//! TOML file (`./towerfeed.toml` unless `--config` says otherwise) can override
//! any subset of keys; a missing file yields `Config::default()`.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::util::{validate_site_url, UrlValidationError};

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

    #[error("Invalid site_url '{url}': {source}")]
    InvalidSiteUrl {
        url: String,
        #[source]
        source: UrlValidationError,
    },
}

// ============================================================================
// Configuration Structs
// ============================================================================

pub const DEFAULT_SITE_URL: &str = "https://www.cyberlorekeeper.com";
pub const DEFAULT_NAMESPACE_URL: &str = "https://www.cyberlorekeeper.com/rss/tower";

/// Top-level generator configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site base URL. Normalized by [`Config::validate`] to carry no trailing slash.
    pub site_url: String,

    /// Chronicles index JSON, relative to the invocation directory.
    pub chronicles_path: PathBuf,

    /// Where the generated RSS document is written.
    pub output_path: PathBuf,

    /// Path of the published feed under `site_url`, used for the `atom:link` self reference.
    pub self_link_path: String,

    /// URI bound to the `tower:` prefix for the vendor fields.
    pub namespace_url: String,

    pub feed: FeedMeta,
}

/// Channel-level metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedMeta {
    pub title: String,
    pub description: String,
    pub language: String,
    /// Site-relative path of the feed image. An empty string disables the `<image>` block.
    pub image: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            chronicles_path: PathBuf::from("./data/chronicles.index.json"),
            output_path: PathBuf::from("./rss.xml"),
            self_link_path: "/rss.xml".to_string(),
            namespace_url: DEFAULT_NAMESPACE_URL.to_string(),
            feed: FeedMeta::default(),
        }
    }
}

impl Default for FeedMeta {
    fn default() -> Self {
        Self {
            title: "The Dreaming Tower Archives".to_string(),
            description: "Tales from the Digital Realm \u{2014} Cybersecurity wisdom through \
                fantasy storytelling. Follow the Secret Council of the Kingdom of Cipheria as \
                they defend against threats that mirror our modern digital challenges."
                .to_string(),
            language: "en-us".to_string(),
            image: Some("/images/favicon-96x96.png".to_string()),
        }
    }
}

impl FeedMeta {
    /// The feed image path, if one is configured and non-empty.
    pub fn image_path(&self) -> Option<&str> {
        self.image.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "site_url",
        "chronicles_path",
        "output_path",
        "self_link_path",
        "namespace_url",
        "feed",
    ];

    /// Load configuration from a TOML file and validate it.
    ///
    /// - Missing file → validated `Config::default()`
    /// - Empty file → validated `Config::default()`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    /// - Bad `site_url` → `Err(ConfigError::InvalidSiteUrl)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
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
                return Self::default().validate();
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Self::default().validate();
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Self::default().validate();
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        let config = config.validate()?;
        tracing::info!(path = %path.display(), site_url = %config.site_url, "Loaded configuration");
        Ok(config)
    }

    /// Checks the site URL and normalizes it to carry no trailing slash.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.site_url =
            validate_site_url(&self.site_url).map_err(|source| ConfigError::InvalidSiteUrl {
                url: self.site_url.clone(),
                source,
            })?;
        Ok(self)
    }

    /// Absolute URL of the published feed itself.
    pub fn self_link(&self) -> String {
        let path = self.self_link_path.trim();
        if path.starts_with('/') {
            format!("{}{}", self.site_url, path)
        } else {
            format!("{}/{}", self.site_url, path)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
