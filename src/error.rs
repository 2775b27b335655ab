use std::time::Duration;

/// Errors raised while driving the renderer or loading configuration.
///
/// Sub-page errors never escape the aggregator: they are logged and the
/// corresponding entry of the exam record is left empty.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// No renderer session could be created
    #[error("failed to connect to renderer: {0}")]
    Connect(String),

    /// The renderer could not load a URL
    #[error("failed to navigate to {url}: {message}")]
    Navigation { url: String, message: String },

    /// A required element did not appear in time
    #[error("timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    /// A script could not be executed in the page
    #[error("script execution failed: {0}")]
    Script(String),

    /// The renderer session failed outside of navigation
    #[error("renderer session error: {0}")]
    Session(String),

    /// A layout selector did not parse
    #[error("invalid selector {0}")]
    Selector(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

impl CrawlError {
    /// True when the error is a bounded wait that ran out
    pub fn is_timeout(&self) -> bool {
        matches!(self, CrawlError::Timeout { .. })
    }
}
