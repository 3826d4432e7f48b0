//! jsoncache - a local JSON-backed data cache with optional remote refresh.
//!
//! A [`Store`] holds one JSON dataset in memory, persists it to a local file
//! (optionally key-sorted, with timestamped backups) and refreshes it from a
//! remote JSON endpoint. A shared [`Manifest`] records the length and
//! fingerprint of the last content seen for each file path or URL so that
//! unchanged saves and downloads can be skipped.

pub mod cache;
pub mod config;
pub mod logger;
pub mod manifest;
pub mod remote;
pub mod utils;

pub use cache::{
    load_json, save_json, sort_by_key, DownloadStatus, SaveOptions, SortOrder, Store,
};
pub use config::StoreConfig;
pub use logger::{Logger, TracingLogger};
pub use manifest::{fingerprint, Fingerprint, Manifest, ManifestRecord, SharedManifest};
pub use remote::{DownloadError, Fetch, FetchResponse, HttpFetcher};
