use placescout_browser::BrowserError;
use placescout_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid query: {0}")]
    Query(#[from] CoreError),

    #[error("Feed not found ({selector}): {reason}")]
    FeedNotFound { selector: String, reason: String },

    #[error("Invalid selector {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Result sink error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
