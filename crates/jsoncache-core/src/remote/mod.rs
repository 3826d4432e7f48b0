//! Remote JSON retrieval for store refreshes.
//!
//! A download is a single GET with no retry. Failures are reported through
//! [`DownloadError`] and never touch the in-memory dataset.

pub mod error;
pub mod fetcher;

pub use error::DownloadError;
pub use fetcher::{Fetch, FetchResponse, HttpFetcher};
