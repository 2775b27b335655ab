use crate::error::CrawlError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for a full scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// First page of the exam listing
    #[serde(default = "default_listing_url")]
    pub listing_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Where the JSON array of exam records is written
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Number of renderer sessions aggregating exams in parallel
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Stop walking the listing after this many pages
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// How long to wait for a sub-page heading
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Pause after scrolling so lazy content can load
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,

    /// Upper bound on a whole sub-page visit
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// How long to wait for the first exam card on a listing page
    #[serde(default = "default_listing_wait_secs")]
    pub listing_wait_secs: u64,

    #[serde(default = "default_listing_scroll_passes")]
    pub listing_scroll_passes: u32,

    #[serde(default = "default_listing_scroll_pause_secs")]
    pub listing_scroll_pause_secs: u64,

    /// Whether exams hosted outside the listing's domain are kept
    #[serde(default)]
    pub allow_external: bool,

    /// Regex patterns an exam URL must match (any of)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns that drop an exam URL
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Extra browser arguments for the WebDriver session (e.g. `--headless=new`)
    #[serde(default)]
    pub browser_args: Vec<String>,

    /// Selectors describing the site's markup
    #[serde(default)]
    pub layout: PageLayout,
}

/// CSS selectors used to read listing cards and exam sub-pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Element whose presence means a sub-page has rendered
    pub ready: String,
    pub title: String,
    /// Candidates for the "last updated" element; only these tags are searched for the marker
    pub updated: String,
    /// Text that marks the "last updated" element
    pub updated_marker: String,
    pub author: String,
    pub author_link: String,
    pub author_image: String,
    pub author_role: String,
    pub content_container: String,
    pub blocks: String,
    pub faq_question: String,
    pub faq_answer_wrapper: String,
    pub faq_answer: String,
    pub poll: String,
    pub poll_question: String,
    pub poll_option: String,
    pub poll_votes: String,
    pub votes_marker: String,
    pub exam_card: String,
    pub card_title: String,
    pub card_full_name: String,
    pub card_date_rows: String,
    pub card_date: String,
    pub card_event: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            ready: "h1".to_string(),
            title: "h1".to_string(),
            updated: "span".to_string(),
            updated_marker: "Updated".to_string(),
            author: "div.ppBox".to_string(),
            author_link: "a".to_string(),
            author_image: "img".to_string(),
            author_role: "p.ePPDetail".to_string(),
            content_container: "div.sectionalWrapperClass".to_string(),
            blocks: "h2, h3, h4, p, ul, table, iframe".to_string(),
            faq_question: "strong.flx-box".to_string(),
            faq_answer_wrapper: "div".to_string(),
            faq_answer: "div.facb5f".to_string(),
            poll: "div.poll-container".to_string(),
            poll_question: "div.poll-question".to_string(),
            poll_option: "div.poll-option".to_string(),
            poll_votes: "span".to_string(),
            votes_marker: "votes".to_string(),
            exam_card: ".uilp_exam_card".to_string(),
            card_title: ".exam_title".to_string(),
            card_full_name: ".exam_flnm".to_string(),
            card_date_rows: ".exam_impdates table tr".to_string(),
            card_date: ".fix-tdwidth p".to_string(),
            card_event: ".fix-textlength p".to_string(),
        }
    }
}

fn default_listing_url() -> String {
    "https://www.shiksha.com/mba/exams-pc-101".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_output_path() -> String {
    "complete_exam_data.json".to_string()
}

fn default_max_concurrency() -> usize {
    1
}

fn default_wait_timeout_secs() -> u64 {
    20
}

fn default_settle_delay_secs() -> u64 {
    3
}

fn default_page_timeout_secs() -> u64 {
    60
}

fn default_listing_wait_secs() -> u64 {
    15
}

fn default_listing_scroll_passes() -> u32 {
    3
}

fn default_listing_scroll_pause_secs() -> u64 {
    2
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self::new(&default_listing_url())
    }
}

impl ScrapeConfig {
    /// Create a new configuration with default values
    pub fn new(listing_url: &str) -> Self {
        Self {
            listing_url: listing_url.to_string(),
            webdriver_url: default_webdriver_url(),
            output_path: default_output_path(),
            max_concurrency: default_max_concurrency(),
            max_pages: None,
            wait_timeout_secs: default_wait_timeout_secs(),
            settle_delay_secs: default_settle_delay_secs(),
            page_timeout_secs: default_page_timeout_secs(),
            listing_wait_secs: default_listing_wait_secs(),
            listing_scroll_passes: default_listing_scroll_passes(),
            listing_scroll_pause_secs: default_listing_scroll_pause_secs(),
            allow_external: false,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            browser_args: Vec::new(),
            layout: PageLayout::default(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CrawlError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, CrawlError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the run cannot work with
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.max_concurrency == 0 {
            return Err(CrawlError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        url::Url::parse(&self.listing_url)?;
        Ok(())
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn listing_wait(&self) -> Duration {
        Duration::from_secs(self.listing_wait_secs)
    }

    pub fn listing_scroll_pause(&self) -> Duration {
        Duration::from_secs(self.listing_scroll_pause_secs)
    }
}
