use crate::crawlers::crawler::{PageRenderer, SCROLL_TO_BOTTOM};
use crate::error::CrawlError;
use crate::parsers::listing::ListingParser;
use crate::results::ExamSummary;
use std::time::Duration;
use url::Url;

/// Paginates the exam index and yields the exam summaries on each page
#[derive(Debug, Clone)]
pub struct ListingWalker {
    listing_url: Url,
    parser: ListingParser,
    card_selector: String,
    card_wait: Duration,
    scroll_passes: u32,
    scroll_pause: Duration,
}

impl ListingWalker {
    pub fn new(listing_url: Url, parser: ListingParser, card_selector: &str) -> Self {
        Self {
            listing_url,
            parser,
            card_selector: card_selector.to_string(),
            card_wait: Duration::from_secs(15),
            scroll_passes: 3,
            scroll_pause: Duration::from_secs(2),
        }
    }

    pub fn with_card_wait(mut self, card_wait: Duration) -> Self {
        self.card_wait = card_wait;
        self
    }

    pub fn with_scrolling(mut self, passes: u32, pause: Duration) -> Self {
        self.scroll_passes = passes;
        self.scroll_pause = pause;
        self
    }

    /// URL of a 1-based listing page
    pub fn page_url(&self, page_no: u32) -> Url {
        let mut url = self.listing_url.clone();
        if page_no > 1 {
            url.query_pairs_mut()
                .append_pair("pageNo", &page_no.to_string());
        }
        url
    }

    /// Exams on one listing page.
    ///
    /// A page on which no exam card appears in time is the end of the
    /// index and yields an empty list.
    pub async fn list_page<R>(
        &self,
        renderer: &mut R,
        page_no: u32,
    ) -> Result<Vec<ExamSummary>, CrawlError>
    where
        R: PageRenderer + ?Sized,
    {
        let url = self.page_url(page_no);
        ::log::info!("Scraping listing page {}: {}", page_no, url);

        renderer.navigate(url.as_str()).await?;
        match renderer.wait_for(&self.card_selector, self.card_wait).await {
            Ok(()) => {}
            Err(e) if e.is_timeout() => {
                ::log::info!("No exam cards on listing page {}", page_no);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        }

        for _ in 0..self.scroll_passes {
            renderer.execute_script(SCROLL_TO_BOTTOM).await?;
            tokio::time::sleep(self.scroll_pause).await;
        }

        let html = renderer.current_body().await?;
        Ok(self.parser.parse(&html, &url))
    }

    /// Walks listing pages from 1 until one comes back empty.
    ///
    /// An error on a page stops the walk; exams found so far are kept.
    pub async fn walk<R>(&self, renderer: &mut R, max_pages: Option<u32>) -> Vec<ExamSummary>
    where
        R: PageRenderer + ?Sized,
    {
        let mut exams = Vec::new();
        let mut page_no = 1;

        loop {
            if max_pages.is_some_and(|max| page_no > max) {
                ::log::info!("Reached listing page limit of {}", page_no - 1);
                break;
            }

            match self.list_page(renderer, page_no).await {
                Ok(page) if page.is_empty() => break,
                Ok(page) => {
                    ::log::info!("Found {} exams on listing page {}", page.len(), page_no);
                    exams.extend(page);
                }
                Err(e) => {
                    ::log::error!("Failed to scrape listing page {}: {}", page_no, e);
                    break;
                }
            }

            page_no += 1;
        }

        ::log::info!("Listing walk finished with {} exams", exams.len());
        exams
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageLayout;
    use crate::crawlers::testing::MockRenderer;

    const LISTING: &str = "https://example.com/mba/exams-pc-101";

    fn walker() -> ListingWalker {
        let parser = ListingParser::new(&PageLayout::default()).unwrap();
        ListingWalker::new(Url::parse(LISTING).unwrap(), parser, ".uilp_exam_card")
            .with_card_wait(Duration::from_millis(10))
            .with_scrolling(2, Duration::ZERO)
    }

    fn listing(names: &[&str]) -> String {
        let cards = names
            .iter()
            .map(|name| {
                format!(
                    "<div class=\"uilp_exam_card\"><a class=\"exam_title\" href=\"/{}-exam/\">{}</a></div>",
                    name.to_lowercase(),
                    name
                )
            })
            .collect::<String>();
        format!("<html><body>{}</body></html>", cards)
    }

    #[test]
    fn test_page_url() {
        let walker = walker();
        assert_eq!(walker.page_url(1).as_str(), LISTING);
        assert_eq!(
            walker.page_url(3).as_str(),
            "https://example.com/mba/exams-pc-101?pageNo=3"
        );
    }

    #[tokio::test]
    async fn test_walk_until_empty_page() {
        let walker = walker();
        let mut renderer = MockRenderer::new()
            .with_page(walker.page_url(1).as_str(), listing(&["CAT", "XAT"]))
            .with_page(walker.page_url(2).as_str(), listing(&["MAT"]));

        let exams = walker.walk(&mut renderer, None).await;

        let names = exams.iter().map(|e| e.short_name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["CAT", "XAT", "MAT"]);
        assert_eq!(exams[0].canonical_url, "https://example.com/cat-exam");
        // Page 3 has no cards and ends the walk
        assert_eq!(renderer.visited.len(), 3);
        assert_eq!(renderer.scripts, 4);
    }

    #[tokio::test]
    async fn test_walk_respects_page_limit() {
        let walker = walker();
        let mut renderer = MockRenderer::with_default_page(listing(&["CAT"]));

        let exams = walker.walk(&mut renderer, Some(2)).await;
        assert_eq!(exams.len(), 2);
        assert_eq!(renderer.visited.len(), 2);
    }

    #[tokio::test]
    async fn test_walk_stops_on_navigation_error() {
        let walker = walker();
        let mut renderer = MockRenderer::new()
            .with_page(walker.page_url(1).as_str(), listing(&["CAT"]))
            .with_navigation_error(walker.page_url(2).as_str());

        let exams = walker.walk(&mut renderer, None).await;
        assert_eq!(exams.len(), 1);
    }

    #[tokio::test]
    async fn test_list_page_propagates_navigation_error() {
        let walker = walker();
        let mut renderer = MockRenderer::new().with_navigation_error(LISTING);
        assert!(walker.list_page(&mut renderer, 1).await.is_err());
    }
}
