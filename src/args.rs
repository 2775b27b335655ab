use clap::Parser;
use exam_pages::config::ScrapeConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "exam-pages")]
#[command(about = "Scrapes exam listings and every exam sub-page into one JSON document")]
#[command(version)]
pub struct Args {
    /// First page of the exam listing (defaults to the configured listing)
    pub listing_url: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short = 'f', long)]
    pub config: Option<PathBuf>,

    /// Where to write the JSON output
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of browser sessions aggregating exams in parallel
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Stop after this many listing pages
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Seconds to wait for a sub-page heading
    #[arg(long)]
    pub wait_timeout: Option<u64>,

    /// Seconds to pause after scrolling for lazy content
    #[arg(long)]
    pub settle_delay: Option<u64>,

    /// WebDriver endpoint
    #[arg(long)]
    pub webdriver_url: Option<String>,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply(&self, mut config: ScrapeConfig) -> ScrapeConfig {
        if let Some(url) = &self.listing_url {
            config.listing_url = url.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = Some(max_pages);
        }
        if let Some(secs) = self.wait_timeout {
            config.wait_timeout_secs = secs;
        }
        if let Some(secs) = self.settle_delay {
            config.settle_delay_secs = secs;
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        config
    }
}
