use crate::error::CrawlError;
use async_trait::async_trait;
use std::time::Duration;

/// Script that scrolls to the end of the page to trigger lazy loading
pub const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// A single stateful browser session.
///
/// Methods take `&mut self`: a session serves one navigation at a time and
/// is never shared between workers.
#[async_trait]
pub trait PageRenderer: Send {
    /// Load a URL in the session
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlError>;

    /// Block until an element matching `selector` exists, or time out
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), CrawlError>;

    /// Run a script in the current page
    async fn execute_script(&mut self, script: &str) -> Result<(), CrawlError>;

    /// Markup of the current page as rendered
    async fn current_body(&mut self) -> Result<String, CrawlError>;

    /// End the session
    async fn close(&mut self) -> Result<(), CrawlError>;
}

/// Creates renderer sessions, one per worker
#[async_trait]
pub trait Connect: Send + Sync {
    type Renderer: PageRenderer + 'static;

    async fn connect(&self) -> Result<Self::Renderer, CrawlError>;
}
