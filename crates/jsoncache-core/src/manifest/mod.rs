//! Per-key change records shared between stores.
//!
//! The manifest maps a logical key (a local file path or a remote URL) to the
//! length and fingerprint of the last content seen for it. Stores consult it
//! before writing or replacing data and only touch it when the content
//! actually changed.
//!
//! The manifest is persisted as pretty-printed JSON. Record fields are stored
//! as `length`, `hash` and `date`.

pub mod fingerprint;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub use fingerprint::{fingerprint, Fingerprint};

/// Manifest handle shared by every store that uses it.
pub type SharedManifest = Arc<Mutex<Manifest>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub length: usize,
    #[serde(rename = "hash")]
    pub fingerprint: i32,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl ManifestRecord {
    pub fn new(seen: Fingerprint) -> Self {
        Self {
            length: seen.length,
            fingerprint: seen.hash,
            timestamp: Utc::now(),
        }
    }

    /// True when the record describes content with this length and hash
    pub fn matches(&self, seen: &Fingerprint) -> bool {
        self.length == seen.length && self.fingerprint == seen.hash
    }
}

#[derive(Debug, Default)]
pub struct Manifest {
    records: BTreeMap<String, ManifestRecord>,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Manifest {
    /// In-memory manifest with no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a manifest backed by `path`.
    ///
    /// A missing file gives an empty manifest. A file that does not parse is
    /// logged and treated as empty; it is replaced on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(records) => records,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to parse manifest, starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            records,
            path: Some(path),
            dirty: false,
        })
    }

    /// Wrap this manifest for sharing between stores
    pub fn shared(self) -> SharedManifest {
        Arc::new(Mutex::new(self))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&ManifestRecord> {
        self.records.get(key)
    }

    /// Set a record directly, bypassing change detection. Not persisted
    /// until the next save.
    pub fn insert(&mut self, key: impl Into<String>, record: ManifestRecord) {
        self.records.insert(key.into(), record);
        self.dirty = true;
    }

    pub fn records(&self) -> &BTreeMap<String, ManifestRecord> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the stored record for `key` matches `text`
    pub fn is_unchanged(&self, key: &str, text: &str) -> bool {
        self.records
            .get(key)
            .is_some_and(|record| record.matches(&Fingerprint::of(text)))
    }

    /// Record `text` as the latest content for `key`.
    ///
    /// Returns `Ok(false)` without touching anything when the existing record
    /// already matches. Otherwise the record is replaced and the manifest is
    /// saved immediately.
    pub fn update(&mut self, key: &str, text: &str) -> Result<bool> {
        let seen = Fingerprint::of(text);
        if self.records.get(key).is_some_and(|record| record.matches(&seen)) {
            return Ok(false);
        }

        debug!(key = key, length = seen.length, hash = seen.hash, "Manifest record changed");
        self.records.insert(key.to_string(), ManifestRecord::new(seen));
        self.save(true)?;
        Ok(true)
    }

    /// Persist the manifest.
    ///
    /// With `immediate` the file is written now; otherwise the manifest is
    /// only marked dirty and written by the next [`Manifest::flush`] or
    /// immediate save. In-memory manifests never write.
    pub fn save(&mut self, immediate: bool) -> Result<()> {
        self.dirty = true;
        if immediate {
            self.flush()?;
        }
        Ok(())
    }

    /// Write pending changes, if any
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(ref path) = self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(&self.records)?;
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
        }
        self.dirty = false;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

// ============================================================================
// Tests
// ============================================================================
