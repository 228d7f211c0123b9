use std::{collections::HashMap, time::Duration};

use anyhow::{Context, anyhow};
use reqwest::{Client, ClientBuilder, Response};

/// Anything that can turn a page location into its HTML.
pub trait PageFetcher {
    fn fetch_page(&self, url: &str) -> impl Future<Output = anyhow::Result<String>>;
}

pub struct RequestClient {
    client: Client,
}

impl RequestClient {
    pub fn new(timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("failed to build http client")?;
        Ok(Self { client })
    }

    pub async fn fetch_url_response(&self, url: &str) -> anyhow::Result<Response> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response)
    }

    pub async fn fetch_url_body(&self, url: &str) -> anyhow::Result<String> {
        let response = self.fetch_url_response(url).await?;
        let body = response.text().await?;
        Ok(body)
    }
}

impl PageFetcher for RequestClient {
    async fn fetch_page(&self, url: &str) -> anyhow::Result<String> {
        self.fetch_url_body(url)
            .await
            .with_context(|| format!("failed to fetch {url}"))
    }
}

/// Serves pages from memory. Used for offline runs and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticPages {
    pages: HashMap<String, String>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

impl PageFetcher for StaticPages {
    async fn fetch_page(&self, url: &str) -> anyhow::Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("no page stored for {url}"))
    }
}
