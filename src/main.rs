use clap::Parser;
use exam_pages::ExamScrape;
use exam_pages::config::ScrapeConfig;
use exam_pages::output;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match ScrapeConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => ScrapeConfig::default(),
    };
    let config = args.apply(config);
    let output_path = config.output_path.clone();

    println!("Note: scraping requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using {}",
        config.webdriver_url
    );

    let scrape = ExamScrape::new(&config.listing_url).with_config(config);

    let records = match scrape.run().await {
        Ok(records) => records,
        Err(e) => {
            ::log::error!("Scrape failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = output::write_records(&output_path, &records) {
        ::log::error!("Failed to write {}: {}", output_path, e);
        std::process::exit(1);
    }

    println!("Saved {} exams to {}", records.len(), output_path);
}
