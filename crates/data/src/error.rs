use thiserror::Error;

/// Errors raised by the REST collaborators.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Chat stream interrupted or malformed.
    #[error("stream error: {0}")]
    Stream(String),
}

impl DataError {
    /// Whether the caller may reasonably retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Decode(_) | Self::Stream(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        let status = |status| DataError::Status {
            status,
            body: String::new(),
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(404).is_transient());
        assert!(!DataError::Stream("eof".into()).is_transient());
    }
}
