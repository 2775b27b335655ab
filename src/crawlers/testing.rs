//! In-memory renderer used by the crawler tests

use crate::crawlers::crawler::{Connect, PageRenderer};
use crate::error::CrawlError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    pages: HashMap<String, String>,
    default_page: Option<String>,
    timeouts: HashSet<String>,
    broken: HashSet<String>,
    current: String,
    pub visited: Vec<String>,
    pub scripts: usize,
    pub closed: bool,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Served for any URL without a page of its own
    pub fn with_default_page(html: String) -> Self {
        Self {
            default_page: Some(html),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    /// The ready element never shows up on this URL
    pub fn with_timeout(mut self, url: &str) -> Self {
        self.timeouts.insert(url.to_string());
        self
    }

    pub fn with_navigation_error(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlError> {
        self.visited.push(url.to_string());
        self.current = url.to_string();
        if self.broken.contains(url) {
            return Err(CrawlError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), CrawlError> {
        let known = self.pages.contains_key(&self.current) || self.default_page.is_some();
        if self.timeouts.contains(&self.current) || !known {
            return Err(CrawlError::Timeout {
                what: format!("'{}' on {}", selector, self.current),
                after: timeout,
            });
        }
        Ok(())
    }

    async fn execute_script(&mut self, _script: &str) -> Result<(), CrawlError> {
        self.scripts += 1;
        Ok(())
    }

    async fn current_body(&mut self) -> Result<String, CrawlError> {
        self.pages
            .get(&self.current)
            .or(self.default_page.as_ref())
            .cloned()
            .ok_or_else(|| CrawlError::Session(format!("no page for {}", self.current)))
    }

    async fn close(&mut self) -> Result<(), CrawlError> {
        self.closed = true;
        Ok(())
    }
}

/// Hands out clones of a template renderer, failing after `limit` sessions
pub struct MockConnector {
    template: MockRenderer,
    limit: usize,
    pub connections: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn new(template: MockRenderer) -> Self {
        Self {
            template,
            limit: usize::MAX,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl Connect for MockConnector {
    type Renderer = MockRenderer;

    async fn connect(&self) -> Result<MockRenderer, CrawlError> {
        let n = self.connections.fetch_add(1, Ordering::SeqCst);
        if n >= self.limit {
            return Err(CrawlError::Connect("no WebDriver available".to_string()));
        }
        Ok(self.template.clone())
    }
}
