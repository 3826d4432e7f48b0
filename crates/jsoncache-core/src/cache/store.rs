use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::{Map, Value};
use tracing::debug;

use super::backup::rotate_backup;
use super::json::save_json;
use super::sort::{sort_by_key, SortOrder};
use crate::config::StoreConfig;
use crate::logger::{Logger, TracingLogger};
use crate::manifest::{Manifest, SharedManifest};
use crate::remote::{DownloadError, Fetch, HttpFetcher};

/// Options for [`Store::save`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Replace an existing file. When false an existing file is left alone.
    pub overwrite: bool,
    pub sort: SortOrder,
    /// Sort nested mappings as well as the top level
    pub recursive: bool,
}

impl SaveOptions {
    /// Overwrite without sorting
    pub fn overwriting() -> Self {
        Self {
            overwrite: true,
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort: impl Into<SortOrder>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Rewrite applied after loading a file the manifest does not recognise
    fn canonical() -> Self {
        Self::overwriting().sorted(SortOrder::Lexicographic)
    }
}

/// Result of [`Store::download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    /// No remote URL configured
    NotConfigured,
    /// Another download on this store is still running; nothing was done
    InFlight,
    /// Remote content matches the manifest record; dataset kept
    Unchanged,
    /// Dataset replaced; carries the serialized content
    Replaced(String),
}

impl DownloadStatus {
    pub fn text(&self) -> Option<&str> {
        match self {
            DownloadStatus::Replaced(text) => Some(text),
            _ => None,
        }
    }
}

/// Claim on a store's single download slot, released on drop
struct DownloadSlot<'a>(&'a AtomicBool);

impl<'a> DownloadSlot<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for DownloadSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// JSON falsiness: null, false, zero and the empty string
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn empty_dataset() -> Value {
    Value::Object(Map::new())
}

/// Manifest key for a local file
fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// An in-memory JSON dataset backed by a local file and/or a remote URL.
///
/// All operations take `&self`; the dataset sits behind a lock so a store can
/// be read while a download is outstanding.
pub struct Store {
    config: StoreConfig,
    dataset: RwLock<Value>,
    manifest: Option<SharedManifest>,
    logger: Arc<dyn Logger>,
    fetcher: Arc<dyn Fetch>,
    downloading: AtomicBool,
}

impl Store {
    /// Create a store with the default logger and HTTP client, then load the
    /// local file.
    pub fn new(config: StoreConfig, manifest: Option<SharedManifest>) -> Result<Self> {
        Self::with_parts(
            config,
            manifest,
            Arc::new(TracingLogger),
            Arc::new(HttpFetcher::new()?),
        )
    }

    pub fn with_parts(
        config: StoreConfig,
        manifest: Option<SharedManifest>,
        logger: Arc<dyn Logger>,
        fetcher: Arc<dyn Fetch>,
    ) -> Result<Self> {
        logger.log(&format!("store create(config: {:?})", config));

        let store = Self {
            config,
            dataset: RwLock::new(empty_dataset()),
            manifest,
            logger,
            fetcher,
            downloading: AtomicBool::new(false),
        };
        store.load()?;
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn manifest(&self) -> Option<&SharedManifest> {
        self.manifest.as_ref()
    }

    // ===== Dataset access =====

    pub(crate) fn read_data(&self) -> RwLockReadGuard<'_, Value> {
        self.dataset.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_data(&self) -> RwLockWriteGuard<'_, Value> {
        self.dataset.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the dataset
    pub fn data(&self) -> Value {
        self.read_data().clone()
    }

    /// Run `f` against the dataset without copying it
    pub fn with_data<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.read_data())
    }

    /// Replace the in-memory dataset. Nothing is written until [`Store::save`].
    pub fn replace(&self, data: Value) {
        *self.write_data() = data;
    }

    /// Reset the in-memory dataset to an empty mapping
    pub fn clear(&self) {
        self.replace(empty_dataset());
    }

    pub fn is_empty(&self) -> bool {
        match &*self.read_data() {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    // ===== Manifest =====

    fn lock_manifest(manifest: &SharedManifest) -> MutexGuard<'_, Manifest> {
        manifest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn manifest_matches(&self, key: &str, text: &str) -> bool {
        self.manifest
            .as_ref()
            .is_some_and(|m| Self::lock_manifest(m).is_unchanged(key, text))
    }

    /// Record `text` as the current content for `key`.
    ///
    /// Returns whether the manifest changed. Without a manifest this does
    /// nothing.
    pub fn update_manifest(&self, key: &str, text: &str) -> Result<bool> {
        match self.manifest {
            Some(ref manifest) => Self::lock_manifest(manifest).update(key, text),
            None => Ok(false),
        }
    }

    // ===== Local file =====

    /// Read the local file into memory.
    ///
    /// A missing path or file leaves the dataset as is. Unparseable content is
    /// logged and replaced by an empty mapping. If the manifest does not
    /// recognise the file it is rewritten sorted straight away.
    pub fn load(&self) -> Result<()> {
        let Some(path) = self.config.local_path.as_deref() else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file: {}", path.display()))?;

        let data = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                self.logger.error(&format!(
                    "Failed to parse {}: {}",
                    path.display(),
                    e
                ));
                empty_dataset()
            }
        };
        self.replace(data);

        if self.manifest_matches(&path_key(path), &text) {
            debug!(path = %path.display(), "Loaded file matches manifest");
            return Ok(());
        }
        self.save(&SaveOptions::canonical())
    }

    /// Write the dataset to the local file.
    ///
    /// Sorting replaces the in-memory dataset with the sorted copy, even when
    /// the write is then skipped because the file exists and `overwrite` is
    /// false. An existing file is moved to the backup directory, if one is
    /// configured, before being replaced.
    pub fn save(&self, options: &SaveOptions) -> Result<()> {
        let Some(path) = self.config.local_path.as_deref() else {
            return Ok(());
        };

        if options.sort.is_sorted() {
            let mut data = self.write_data();
            let current = std::mem::take(&mut *data);
            *data = sort_by_key(current, &options.sort, options.recursive);
        }

        self.logger.log(&format!(
            "store save(overwrite: {}, sort: {}) to: {}",
            options.overwrite,
            options.sort,
            path.display()
        ));

        let exists = path.exists();
        if exists && !options.overwrite {
            return Ok(());
        }

        if exists {
            if let Some(ref backup_dir) = self.config.backup_dir {
                let dest = rotate_backup(path, backup_dir, &Local::now())?;
                debug!(from = %path.display(), to = %dest.display(), "Backed up data file");
            }
        }

        let text = save_json(&self.read_data(), path)?;
        self.update_manifest(&path_key(path), &text)?;
        Ok(())
    }

    // ===== Remote =====

    /// Whether a download is currently running on this store
    pub fn is_downloading(&self) -> bool {
        self.downloading.load(Ordering::Acquire)
    }

    /// Fetch the remote URL and replace the dataset with the result.
    ///
    /// Only one download runs per store; a call made while another is
    /// outstanding returns [`DownloadStatus::InFlight`] without doing
    /// anything. With `skip_if_same`, content matching the manifest record
    /// for the URL leaves the dataset alone. Failures are logged, returned,
    /// and never modify the dataset.
    pub async fn download(&self, skip_if_same: bool) -> Result<DownloadStatus, DownloadError> {
        let Some(url) = self.config.remote_url.as_deref() else {
            return Ok(DownloadStatus::NotConfigured);
        };
        let Some(_slot) = DownloadSlot::claim(&self.downloading) else {
            debug!(url = url, "Download already in flight, ignoring");
            return Ok(DownloadStatus::InFlight);
        };

        let response = match self.fetcher.get_json(url).await {
            Ok(response) => response,
            Err(e) => {
                self.logger.warn(&format!("Failed to get {}: {}", url, e));
                return Err(e);
            }
        };

        if response.status >= 400 {
            self.logger
                .warn(&format!("Failed to get {}: status {}", url, response.status));
            return Err(DownloadError::Status(response.status));
        }

        let data = match response.body {
            Some(body) if !is_falsy(&body) => body,
            _ => {
                self.logger.warn(&format!("Failed to get {}: empty body", url));
                return Err(DownloadError::EmptyBody(response.status));
            }
        };

        let text = serde_json::to_string_pretty(&data)
            .map_err(|e| DownloadError::InvalidResponse(e.to_string()))?;

        if skip_if_same && self.manifest_matches(url, &text) {
            debug!(url = url, "Remote content unchanged, keeping dataset");
            return Ok(DownloadStatus::Unchanged);
        }

        self.replace(data);
        self.update_manifest(url, &text)
            .map_err(|e| DownloadError::Manifest(format!("{:#}", e)))?;
        Ok(DownloadStatus::Replaced(text))
    }
}

// ============================================================================
// Tests
// ============================================================================
