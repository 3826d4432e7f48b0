use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Empty response body (status {0})")]
    EmptyBody(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to record download in manifest: {0}")]
    Manifest(String),
}

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 200;

impl DownloadError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    /// HTTP status that caused the failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            DownloadError::Status(code) | DownloadError::EmptyBody(code) => Some(*code),
            DownloadError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
