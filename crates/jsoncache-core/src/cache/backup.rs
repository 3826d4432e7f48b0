use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::utils::backup_stamp;

/// Backup destination for `source`: `<file name>_<YYYYMMDDHHMMSS><ext>`.
///
/// The full file name (extension included) is kept as the stem, so
/// `data.json` becomes `data.json_20240307090501.json`.
pub fn backup_path(source: &Path, backup_dir: &Path, at: &DateTime<Local>) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    backup_dir.join(format!("{}_{}{}", file_name, backup_stamp(at), ext))
}

/// Move `source` into `backup_dir`, returning the new location
pub fn rotate_backup(source: &Path, backup_dir: &Path, at: &DateTime<Local>) -> Result<PathBuf> {
    std::fs::create_dir_all(backup_dir)
        .with_context(|| format!("Failed to create backup directory: {}", backup_dir.display()))?;

    let dest = backup_path(source, backup_dir, at);
    std::fs::rename(source, &dest).with_context(|| {
        format!("Failed to move {} to {}", source.display(), dest.display())
    })?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap()
    }

    #[test]
    fn test_backup_path_keeps_name_and_extension() {
        let dest = backup_path(Path::new("/data/db.json"), Path::new("/bak"), &fixed_time());
        assert_eq!(dest, PathBuf::from("/bak/db.json_20240307090501.json"));
    }

    #[test]
    fn test_backup_path_without_extension() {
        let dest = backup_path(Path::new("/data/db"), Path::new("/bak"), &fixed_time());
        assert_eq!(dest, PathBuf::from("/bak/db_20240307090501"));
    }

    #[test]
    fn test_rotate_backup_moves_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("db.json");
        std::fs::write(&source, "old").unwrap();
        let backup_dir = dir.path().join("backup");

        let dest = rotate_backup(&source, &backup_dir, &fixed_time()).unwrap();
        assert!(!source.exists());
        assert_eq!(std::fs::read_to_string(dest).unwrap(), "old");
    }

    #[test]
    fn test_rotate_backup_missing_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = rotate_backup(&dir.path().join("gone.json"), dir.path(), &fixed_time());
        assert!(result.is_err());
    }
}
