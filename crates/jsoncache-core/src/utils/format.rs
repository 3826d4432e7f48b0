use chrono::{DateTime, TimeZone};

/// Timestamp layout used in backup file names: YYYYMMDDHHMMSS
const BACKUP_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Format a timestamp for a backup file name
pub fn backup_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(BACKUP_STAMP_FORMAT).to_string()
}

/// Compare two strings for equality ignoring case
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_uppercase() == b.to_uppercase()
}
