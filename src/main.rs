use dotenv::dotenv;
use gas_scrape::ScrapingContext;
use log::{LevelFilter, error, info, warn};

extern crate env_logger;
extern crate log;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let context = match ScrapingContext::new() {
        Ok(context) => context,
        Err(e) => {
            error!("Failed to set up scraping: {e:#}");
            std::process::exit(1);
        }
    };

    match context.run().await {
        Ok(report) => {
            info!(
                "Done: {} stations written to {}",
                report.stations.len(),
                context.scraping_config.output_path.display()
            );
            if !report.failed.is_empty() {
                warn!("{} pages skipped: {}", report.failed.len(), report.failed.join(", "));
            }
        }
        Err(e) => {
            error!("Scrape aborted: {e:#}");
            std::process::exit(1);
        }
    }
}
