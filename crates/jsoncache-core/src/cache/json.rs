use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::error;

/// Write `value` as pretty-printed JSON, returning the text written
pub fn save_json(value: &Value, path: &Path) -> Result<String> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, &json)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;
    Ok(json)
}

/// Read a JSON file.
///
/// Returns `None` when the file is missing or does not parse; parse failures
/// are logged.
pub fn load_json(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;

    match serde_json::from_str(&contents) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to parse JSON file");
            Ok(None)
        }
    }
}
