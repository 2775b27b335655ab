// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod kinds;
pub mod output;
pub mod parsers;
pub mod results;

// Re-export commonly used types for convenience
pub use error::CrawlError;
pub use kinds::SubPageKind;
pub use results::{ContentBlock, ExamRecord, ExamSummary, PageExtraction};

use crawlers::aggregator::Aggregator;
use crawlers::crawler::{Connect, PageRenderer};
use crawlers::listing::ListingWalker;
use crawlers::web::WebDriverConnector;
use filter::{ExamFilter, ExamFilterConfig};
use parsers::Classifier;
use parsers::listing::ListingParser;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Main builder for a scrape run: walk the listing, then aggregate every exam
pub struct ExamScrape {
    config: config::ScrapeConfig,
}

impl ExamScrape {
    /// Create a new builder for the given listing URL
    pub fn new(listing_url: &str) -> Self {
        Self {
            config: config::ScrapeConfig::new(listing_url),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: config::ScrapeConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self, CrawlError> {
        let config = config::ScrapeConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set the number of renderer sessions working in parallel
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Stop the listing walk after this many pages
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.config.max_pages = Some(max_pages);
        self
    }

    /// Set the bound on waiting for a sub-page heading
    pub fn with_wait_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.wait_timeout_secs = timeout_seconds;
        self
    }

    /// Set the pause that lets lazy content load after scrolling
    pub fn with_settle_delay(mut self, delay_seconds: u64) -> Self {
        self.config.settle_delay_secs = delay_seconds;
        self
    }

    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.config.webdriver_url = webdriver_url.to_string();
        self
    }

    pub fn config(&self) -> &config::ScrapeConfig {
        &self.config
    }

    /// Run against a WebDriver server.
    ///
    /// The `WEBDRIVER_URL` environment variable overrides the configured endpoint.
    pub async fn run(self) -> Result<Vec<ExamRecord>, CrawlError> {
        let mut webdriver_url = self.config.webdriver_url.clone();
        if let Ok(url) = std::env::var("WEBDRIVER_URL") {
            if !url.is_empty() {
                webdriver_url = url;
            }
        }

        let connector = WebDriverConnector::new(&webdriver_url, self.config.browser_args.clone());
        self.run_with(connector).await
    }

    /// Run with any renderer backend.
    ///
    /// Only a failure to open the first session is fatal; everything after
    /// that degrades to missing exams or missing sub-pages.
    pub async fn run_with<C>(self, connector: C) -> Result<Vec<ExamRecord>, CrawlError>
    where
        C: Connect + 'static,
    {
        let config = self.config;
        config.validate()?;
        let start = Instant::now();

        let listing_url = Url::parse(&config.listing_url)?;
        let walker = ListingWalker::new(
            listing_url.clone(),
            ListingParser::new(&config.layout)?,
            &config.layout.exam_card,
        )
        .with_card_wait(config.listing_wait())
        .with_scrolling(config.listing_scroll_passes, config.listing_scroll_pause());

        let aggregator = Aggregator::new(Classifier::new(&config.layout)?, &config.layout.ready)
            .with_wait_timeout(config.wait_timeout())
            .with_settle_delay(config.settle_delay())
            .with_page_timeout(config.page_timeout());

        let exam_filter = ExamFilter::new(ExamFilterConfig::from_scrape_config(
            &config,
            &listing_url,
        ))?;

        ::log::info!("Starting exam scrape for: {}", listing_url);
        let mut session = connector.connect().await?;

        let exams = exam_filter.apply(walker.walk(&mut session, config.max_pages).await);
        if exams.is_empty() {
            ::log::warn!("No exams found on {}", listing_url);
            if let Err(e) = session.close().await {
                ::log::warn!("Failed to close session: {}", e);
            }
            return Ok(Vec::new());
        }

        let records = crawlers::workers::aggregate_all(
            Arc::new(connector),
            session,
            exams,
            Arc::new(aggregator),
            config.max_concurrency,
        )
        .await;

        let missing: usize = records.iter().map(ExamRecord::failed_count).sum();
        ::log::info!(
            "Scrape complete - {} exams, {} missing sub-pages, {:.2} seconds",
            records.len(),
            missing,
            start.elapsed().as_secs_f64()
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawlers::testing::{MockConnector, MockRenderer};

    const LISTING: &str = "https://example.com/mba/exams-pc-101";

    fn fast(scrape: ExamScrape) -> ExamScrape {
        let mut config = scrape.config().clone();
        config.wait_timeout_secs = 0;
        config.settle_delay_secs = 0;
        config.listing_wait_secs = 0;
        config.listing_scroll_pause_secs = 0;
        scrape.with_config(config)
    }

    fn listing_page() -> String {
        "<html><body>\
           <div class=\"uilp_exam_card\"><a class=\"exam_title\" href=\"/cat-exam\">CAT</a></div>\
           <div class=\"uilp_exam_card\"><a class=\"exam_title\" href=\"https://other.org/gmat\">GMAT</a></div>\
           <div class=\"uilp_exam_card\"><a class=\"exam_title\" href=\"/xat-exam\">XAT</a></div>\
         </body></html>"
            .to_string()
    }

    fn exam_page(title: &str) -> String {
        format!("<html><body><h1>{}</h1></body></html>", title)
    }

    #[tokio::test]
    async fn test_end_to_end_with_mock_renderer() {
        let cat = "https://example.com/cat-exam";
        let xat = "https://example.com/xat-exam";
        let mut template = MockRenderer::new()
            .with_page(LISTING, listing_page())
            .with_timeout(&SubPageKind::Results.url_for(cat));
        for kind in SubPageKind::ALL {
            template = template
                .with_page(&kind.url_for(cat), exam_page("CAT"))
                .with_page(&kind.url_for(xat), exam_page("XAT"));
        }

        let connector = MockConnector::new(template);
        let records = fast(ExamScrape::new(LISTING).with_max_concurrency(2))
            .run_with(connector)
            .await
            .unwrap();

        // The external exam is filtered out
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].summary.short_name, "CAT");
        assert_eq!(records[1].summary.short_name, "XAT");

        assert!(records[0].pages[&SubPageKind::Results].is_none());
        assert_eq!(records[0].failed_count(), 1);
        assert_eq!(records[1].failed_count(), 0);
        assert_eq!(
            records[1].page(SubPageKind::Mca).unwrap().title.as_deref(),
            Some("XAT")
        );
    }

    #[tokio::test]
    async fn test_first_session_failure_is_fatal() {
        let connector = MockConnector::new(MockRenderer::new()).with_limit(0);
        let err = fast(ExamScrape::new(LISTING))
            .run_with(connector)
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::Connect(_)));
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let connector = MockConnector::new(MockRenderer::new());
        let records = fast(ExamScrape::new(LISTING))
            .run_with(connector)
            .await
            .unwrap();
        assert!(records.is_empty());
    }
}
