use std::time::Duration;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, ScrapeError>;

/// Failures raised while driving a page.
///
/// Detail pages treat every variant as "skip this URL". Listing pages treat
/// them as fatal once the retry budget is spent.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timed out after {timeout:?} waiting for `{selector}`")]
    MarkerTimeout { selector: String, timeout: Duration },

    #[error("Invalid CSS selector `{0}`")]
    InvalidSelector(String),

    #[error("Browser error: {0:#}")]
    Browser(anyhow::Error),
}
