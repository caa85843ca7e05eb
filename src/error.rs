//! Typed errors for the reader.
//!
//! Only `MountError::MissingMountPoint` is fatal, and only at construction
//! time. Everything a render can hit while navigating is a `RenderError`,
//! which the router logs and absorbs.

use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the remote read API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No response registered for {0}")]
    Missing(String),
}

/// Failures of the output sink.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("Mount point {} does not exist, cannot build the UI", path.display())]
    MissingMountPoint { path: PathBuf },

    #[error("Failed to write mount point {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mount lock poisoned")]
    LockPoisoned,
}

/// Errors from a single view render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Mount(#[from] MountError),
}

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
