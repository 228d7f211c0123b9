use std::fmt;

use anyhow::anyhow;
use futures::{Stream, StreamExt, stream};
use log::{info, warn};

use crate::{
    extract_error::ExtractError, requests::PageFetcher, station::StationRecord,
    station_scraper::StationScraper,
};

#[derive(Debug)]
pub enum PageError {
    Fetch(anyhow::Error),
    Extract(ExtractError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::Fetch(e) => write!(f, "fetch failed: {e:#}"),
            PageError::Extract(e) => write!(f, "extraction failed: {e}"),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            // Display already carries the fetch chain.
            PageError::Fetch(_) => None,
            PageError::Extract(e) => Some(e),
        }
    }
}

#[derive(Debug)]
pub struct PageOutcome {
    pub url: String,
    pub result: Result<StationRecord, PageError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run at the first page that fails.
    #[default]
    Abort,
    SkipAndLog,
}

#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub stations: Vec<StationRecord>,
    pub failed: Vec<String>,
}

/// Fetches and scrapes the pages one at a time, in order. Nothing happens
/// until the stream is polled.
pub fn scrape_stations<'a, F: PageFetcher>(
    fetcher: &'a F,
    scraper: &'a StationScraper,
    urls: Vec<String>,
) -> impl Stream<Item = PageOutcome> + 'a {
    stream::iter(urls).then(move |url| async move {
        let result = match fetcher.fetch_page(&url).await {
            Ok(html) => scraper.scrape_html(&url, &html).map_err(PageError::Extract),
            Err(e) => Err(PageError::Fetch(e)),
        };
        PageOutcome { url, result }
    })
}

pub async fn collect_stations(
    outcomes: impl Stream<Item = PageOutcome>,
    policy: FailurePolicy,
) -> anyhow::Result<ScrapeReport> {
    let mut outcomes = std::pin::pin!(outcomes);
    let mut report = ScrapeReport::default();
    while let Some(PageOutcome { url, result }) = outcomes.next().await {
        match result {
            Ok(station) => {
                info!("Scraped {} ({})", station.name, url);
                report.stations.push(station);
            }
            Err(e) => match policy {
                FailurePolicy::Abort => {
                    return Err(anyhow!(e).context(format!("failed to scrape {url}")));
                }
                FailurePolicy::SkipAndLog => {
                    warn!("Skipping {url}: {e}");
                    report.failed.push(url);
                }
            },
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::StaticPages;

    fn station_page(name: &str) -> String {
        format!(
            r#"<html><body><dl class="sp_st"><dt>{name}</dt><dd>1 Main St</dd></dl>
            <table><tr><td class="sp_A"><div class="sp_p"><div class="p3"></div><div class="pd"></div><div class="p9"></div></div><div class="tm">now</div></td></tr></table>
            </body></html>"#
        )
    }

    fn urls(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("http://x/{i}")).collect()
    }

    #[tokio::test]
    async fn test_rows_follow_page_order() {
        let pages = StaticPages::new()
            .with_page("http://x/1", station_page("One"))
            .with_page("http://x/2", station_page("Two"))
            .with_page("http://x/3", station_page("Three"));
        let scraper = StationScraper::new().unwrap();
        let report = collect_stations(scrape_stations(&pages, &scraper, urls(3)), FailurePolicy::Abort)
            .await
            .unwrap();
        let names: Vec<_> = report.stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["One", "Two", "Three"]);
        assert!(report.failed.is_empty());
        assert_eq!(report.stations[1].url, "http://x/2");
        assert_eq!(report.stations[2].regular_credit.as_ref().unwrap().price, "3.9");
    }

    #[tokio::test]
    async fn test_abort_on_first_failure() {
        let pages = StaticPages::new()
            .with_page("http://x/1", station_page("One"))
            .with_page("http://x/3", station_page("Three"));
        let scraper = StationScraper::new().unwrap();
        let err = collect_stations(scrape_stations(&pages, &scraper, urls(3)), FailurePolicy::Abort)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("http://x/2"));
    }

    #[tokio::test]
    async fn test_skip_and_log() {
        let pages = StaticPages::new()
            .with_page("http://x/1", "<html><body>no station</body></html>")
            .with_page("http://x/3", station_page("Three"));
        let scraper = StationScraper::new().unwrap();
        let report = collect_stations(scrape_stations(&pages, &scraper, urls(3)), FailurePolicy::SkipAndLog)
            .await
            .unwrap();
        assert_eq!(report.stations.len(), 1);
        assert_eq!(report.stations[0].name, "Three");
        assert_eq!(report.failed, ["http://x/1", "http://x/2"]);
    }

    #[tokio::test]
    async fn test_outcome_kinds() {
        let pages = StaticPages::new().with_page("http://x/1", "<html></html>");
        let scraper = StationScraper::new().unwrap();
        let outcomes: Vec<_> = scrape_stations(&pages, &scraper, urls(2)).collect().await;
        assert!(matches!(
            outcomes[0].result,
            Err(PageError::Extract(ExtractError::MissingName))
        ));
        assert!(matches!(outcomes[1].result, Err(PageError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_fetch_cause_reported_once() {
        let pages = StaticPages::new();
        let scraper = StationScraper::new().unwrap();
        let err = collect_stations(scrape_stations(&pages, &scraper, urls(1)), FailurePolicy::Abort)
            .await
            .unwrap_err();
        let chain = format!("{err:#}");
        assert_eq!(chain.matches("no page stored for http://x/1").count(), 1);
    }
}
