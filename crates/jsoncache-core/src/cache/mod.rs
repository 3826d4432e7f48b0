//! The JSON data store.
//!
//! This module provides the [`Store`], which keeps one JSON dataset in memory
//! and moves it between three places:
//!
//! - a local file (`load` / `save`, with optional key sorting and timestamped
//!   backups of the file being replaced)
//! - a remote endpoint (`download`)
//! - the shared manifest, which decides whether a save or download actually
//!   changed anything

pub mod backup;
pub mod json;
pub mod sort;
pub mod store;
pub mod tables;

pub use json::{load_json, save_json};
pub use sort::{sort_by_key, SortOrder};
pub use store::{DownloadStatus, SaveOptions, Store};
