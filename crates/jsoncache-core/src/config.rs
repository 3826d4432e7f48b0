//! Store configuration.
//!
//! A store is configured with an optional local file, an optional remote URL
//! and an optional backup directory. Any of them may be absent; the
//! corresponding operation is then a silent no-op.
//!
//! Configuration can be read from a JSON file such as:
//!
//! ```json
//! {
//!   "path": "/var/lib/app/data.json",
//!   "url": "https://example.com/data.json",
//!   "backPath": "/var/lib/app/backup"
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for cache directory paths
const APP_NAME: &str = "jsoncache";

/// Manifest file name
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StoreConfig {
    #[serde(rename = "path", default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(rename = "backPath", default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    pub fn remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    pub fn backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    /// Read a configuration from a JSON file. A missing file gives the
    /// default (empty) configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Default manifest location: `<cache dir>/jsoncache/manifest.json`
    pub fn default_manifest_path() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join(MANIFEST_FILE))
    }
}
