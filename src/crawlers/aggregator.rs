use crate::crawlers::crawler::{PageRenderer, SCROLL_TO_BOTTOM};
use crate::error::CrawlError;
use crate::kinds::SubPageKind;
use crate::parsers::Classifier;
use crate::results::{ExamRecord, ExamSummary, PageExtraction};
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Visits every sub-page of an exam and merges the results into one record
#[derive(Debug, Clone)]
pub struct Aggregator {
    classifier: Classifier,
    ready_selector: String,
    wait_timeout: Duration,
    settle_delay: Duration,
    page_timeout: Duration,
}

impl Aggregator {
    pub fn new(classifier: Classifier, ready_selector: &str) -> Self {
        Self {
            classifier,
            ready_selector: ready_selector.to_string(),
            wait_timeout: Duration::from_secs(20),
            settle_delay: Duration::from_secs(3),
            page_timeout: Duration::from_secs(60),
        }
    }

    /// Bound on waiting for the ready element
    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// Pause after scrolling, for lazy-loaded content
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Bound on a whole sub-page visit
    pub fn with_page_timeout(mut self, page_timeout: Duration) -> Self {
        self.page_timeout = page_timeout;
        self
    }

    /// Builds the record for one exam.
    ///
    /// Every kind is attempted exactly once. A failed sub-page is logged and
    /// stored as `None`; it never stops the remaining kinds.
    pub async fn aggregate<R>(&self, renderer: &mut R, summary: ExamSummary) -> ExamRecord
    where
        R: PageRenderer + ?Sized,
    {
        let start = Instant::now();
        ::log::info!("Processing exam: {}", summary.short_name);

        let mut record = ExamRecord::new(summary);

        for kind in SubPageKind::ALL {
            let url = kind.url_for(&record.summary.canonical_url);
            let page = match self.visit(renderer, &url).await {
                Ok(page) => Some(page),
                Err(e) => {
                    ::log::warn!("{} page error for {}: {}", kind, url, e);
                    None
                }
            };
            record.set(kind, page);
        }

        ::log::info!(
            "Finished {} in {:.2} seconds ({} of {} sub-pages missing)",
            record.summary.short_name,
            start.elapsed().as_secs_f64(),
            record.failed_count(),
            SubPageKind::ALL.len()
        );
        record
    }

    /// Fetches, renders and classifies a single sub-page
    pub async fn visit<R>(&self, renderer: &mut R, url: &str) -> Result<PageExtraction, CrawlError>
    where
        R: PageRenderer + ?Sized,
    {
        ::log::debug!("SCRAPE: {}", url);

        let html = match timeout(self.page_timeout, self.render(renderer, url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(CrawlError::Timeout {
                    what: format!("visit of {}", url),
                    after: self.page_timeout,
                });
            }
        };

        Ok(self.classifier.classify(&html))
    }

    async fn render<R>(&self, renderer: &mut R, url: &str) -> Result<String, CrawlError>
    where
        R: PageRenderer + ?Sized,
    {
        renderer.navigate(url).await?;
        renderer
            .wait_for(&self.ready_selector, self.wait_timeout)
            .await?;
        renderer.execute_script(SCROLL_TO_BOTTOM).await?;
        tokio::time::sleep(self.settle_delay).await;
        renderer.current_body().await
    }
}
