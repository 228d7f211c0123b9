use log::info;

use crate::{
    config::{PageSource, ScrapingConfig},
    page_discovery::PageDiscovery,
    pipeline::{ScrapeReport, collect_stations, scrape_stations},
    requests::{PageFetcher, RequestClient},
    sink::write_stations,
    station_scraper::StationScraper,
};

pub struct ScrapingContext<F = RequestClient> {
    pub scraping_config: ScrapingConfig,
    pub station_scraper: StationScraper,
    pub fetcher: F,
}

impl ScrapingContext {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_config = ScrapingConfig::new()?;
        let fetcher = RequestClient::new(scraping_config.request_timeout, &scraping_config.user_agent)?;
        Self::with_fetcher(scraping_config, fetcher)
    }
}

impl<F: PageFetcher> ScrapingContext<F> {
    pub fn with_fetcher(scraping_config: ScrapingConfig, fetcher: F) -> anyhow::Result<Self> {
        let station_scraper = StationScraper::new()?;
        Ok(ScrapingContext {
            scraping_config,
            station_scraper,
            fetcher,
        })
    }

    pub async fn page_urls(&self) -> anyhow::Result<Vec<String>> {
        match &self.scraping_config.pages {
            PageSource::Listed(pages) => Ok(pages.clone()),
            PageSource::Discover(listing_url) => {
                PageDiscovery::new(listing_url)?.discover(&self.fetcher).await
            }
        }
    }

    pub async fn scrape(&self) -> anyhow::Result<ScrapeReport> {
        let urls = self.page_urls().await?;
        info!("Scraping {} station pages", urls.len());
        let outcomes = scrape_stations(&self.fetcher, &self.station_scraper, urls);
        collect_stations(outcomes, self.scraping_config.failure_policy).await
    }

    /// Scrape every page and write the table to the configured output.
    pub async fn run(&self) -> anyhow::Result<ScrapeReport> {
        let report = self.scrape().await?;
        write_stations(
            &self.scraping_config.output_path,
            self.scraping_config.output_format,
            &report.stations,
        )?;
        Ok(report)
    }
}
