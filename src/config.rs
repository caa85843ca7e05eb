//! Reader configuration, read from `~/.hn_reader/config.toml`.
//!
//! Every section is optional; a missing file means defaults.
//!
//! ```toml
//! [api]
//! feed_url = "https://api.hnpwa.com/v0/news/1.json"
//! item_url = "https://api.hnpwa.com/v0/item/@id.json"
//! timeout_secs = 60
//! user_agent = "hn_hash_reader/0.1"
//!
//! [output]
//! mount = "hn_reader.html"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_FEED_URL: &str = "https://api.hnpwa.com/v0/news/1.json";
pub const DEFAULT_ITEM_URL: &str = "https://api.hnpwa.com/v0/item/@id.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub feed_url: String,
    /// Must contain `@id`, which receives the id taken from `#/show/<id>`.
    pub item_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            item_url: DEFAULT_ITEM_URL.to_string(),
            timeout_secs: 60,
            user_agent: concat!("hn_hash_reader/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File that receives the rendered page. Its directory must already exist;
    /// the default lives in the working directory, which always does.
    pub mount: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mount: PathBuf::from("hn_reader.html"),
        }
    }
}

/// Values given on the command line, each replacing its config entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub mount: Option<PathBuf>,
    pub feed_url: Option<String>,
    pub item_url: Option<String>,
}

impl Config {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(mount) = &overrides.mount {
            self.output.mount = mount.clone();
        }
        if let Some(feed_url) = &overrides.feed_url {
            self.api.feed_url = feed_url.clone();
        }
        if let Some(item_url) = &overrides.item_url {
            self.api.item_url = item_url.clone();
        }
    }

    /// `~/.hn_reader/config.toml`, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".hn_reader").join("config.toml"))
    }
}
