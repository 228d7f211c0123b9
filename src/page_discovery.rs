use anyhow::{Context, anyhow};
use log::{info, warn};
use reqwest::Url;
use scraper::{Html, Selector};

use crate::{requests::PageFetcher, text_manipulators::resolve_link};

/// Finds station pages by scraping a listing page. Each row of the
/// listing's price table has an `.address` cell whose last link points at
/// the station page; sponsored rows carry an extra link before it.
#[derive(Debug)]
pub struct PageDiscovery {
    listing_url: Url,
    table_selector: Selector,
    address_selector: Selector,
    link_selector: Selector,
}

impl PageDiscovery {
    pub fn new(listing_url: &str) -> anyhow::Result<Self> {
        let listing_url = Url::parse(listing_url)
            .with_context(|| format!("invalid discovery url {listing_url}"))?;
        let parse = |s: &str| Selector::parse(s).map_err(|e| anyhow!("invalid selector {s:?}: {e}"));
        Ok(Self {
            listing_url,
            table_selector: parse("#pp_table > table")?,
            address_selector: parse(".address")?,
            link_selector: parse("a[href]")?,
        })
    }

    pub async fn discover(&self, fetcher: &impl PageFetcher) -> anyhow::Result<Vec<String>> {
        let html = fetcher
            .fetch_page(self.listing_url.as_str())
            .await
            .context("failed to fetch station listing")?;
        let pages = self.discover_from_html(&html);
        info!("Discovered {} station pages from {}", pages.len(), self.listing_url);
        Ok(pages)
    }

    pub fn discover_from_html(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let Some(table) = document.select(&self.table_selector).next() else {
            warn!("no station table found on {}", self.listing_url);
            return vec![];
        };

        let mut pages: Vec<String> = vec![];
        for address in table.select(&self.address_selector) {
            let Some(href) = address
                .select(&self.link_selector)
                .last()
                .and_then(|link| link.value().attr("href"))
            else {
                continue;
            };
            let Some(page) = resolve_link(&self.listing_url, href) else {
                warn!("skipping unresolvable station link {href:?}");
                continue;
            };
            let page = page.to_string();
            if !pages.contains(&page) {
                pages.push(page);
            }
        }
        pages
    }
}
