//! Utility functions for string comparison and timestamp formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{backup_stamp, eq_ignore_case};
