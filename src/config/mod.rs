mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::Path;

/// Default transport timeout when neither caller nor file supplies one.
pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;

/// Resolved feed engine configuration.
///
/// `base_url` is used both by the HTTP transport and for rewriting
/// root-relative links in notification bodies.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub request_timeout_sec: u64,
}

impl FeedConfig {
    /// Build a validated config from a base URL and defaults for the rest.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::resolve(base_url.into(), None)
    }

    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = FileConfig::load(path)?;
        let base_url = match file.base_url {
            Some(url) => url,
            None => bail!("base_url must be specified in config file"),
        };
        Self::resolve(base_url, file.request_timeout_sec)
    }

    /// Validate fields and normalize the base URL.
    /// File values override built-in defaults where present.
    pub fn resolve(base_url: String, request_timeout_sec: Option<u64>) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            bail!("base_url must not be empty");
        }

        let request_timeout_sec = request_timeout_sec.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SEC);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than zero");
        }

        Ok(Self {
            base_url,
            request_timeout_sec,
        })
    }
}
