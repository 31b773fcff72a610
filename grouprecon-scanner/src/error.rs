use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limit exceeded by {service}; resume later")]
    QuotaExceeded { service: String },

    #[error("unexpected status code {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid phrase pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl ScanError {
    /// Whether the failure means the archive provider throttled us.
    pub fn is_quota(&self) -> bool {
        matches!(self, ScanError::QuotaExceeded { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
