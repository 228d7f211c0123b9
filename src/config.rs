use std::{path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{pipeline::FailurePolicy, sink::OutputFormat};

/// Los Angeles stations scraped when no page list is configured.
pub const DEFAULT_STATION_PAGES: &[&str] = &[
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Los_Angeles/8262/index.aspx",
    "http://losangeles.gasbuddy.com/Costco_Gas_Stations/Culver_City/850/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Los_Angeles/5344/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Los_Angeles/5769/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Hollywood/10868/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Hollywood/10939/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Los_Angeles/6795/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Eagle_Rock/7810/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Pasadena/8666/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Altadena/934/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/South_Gate/11038/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Los_Angeles/11167/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Los_Angeles/6732/index.aspx",
    "http://losangeles.gasbuddy.com/Costco_Gas_Stations/Commerce/121975/index.aspx",
    "http://losangeles.gasbuddy.com/Costco_Gas_Stations/Northridge/120438/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Chatsworth/6592/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Studio_City/8486/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Vernon/10896/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/Los_Angeles/1713/index.aspx",
    "http://losangeles.gasbuddy.com/ARCO_Gas_Stations/La_Canada/7453/index.aspx",
];

fn default_station_pages() -> Vec<String> {
    DEFAULT_STATION_PAGES.iter().map(|page| page.to_string()).collect()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("stations.json")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// The env config env vars needed for scraping.
#[derive(Debug, Deserialize)]
pub struct ScrapingEnv {
    #[serde(default = "default_station_pages")]
    station_pages: Vec<String>,
    discovery_url: Option<String>,
    #[serde(default = "default_output_path")]
    output_path: PathBuf,
    output_format: Option<String>,
    #[serde(default)]
    skip_failed_pages: bool,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    Listed(Vec<String>),
    Discover(String),
}

#[derive(Debug, Clone)]
pub struct ScrapingConfig {
    pub pages: PageSource,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub failure_policy: FailurePolicy,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl ScrapingConfig {
    pub fn new() -> anyhow::Result<Self> {
        Self::from_scraping_env(ScrapingEnv::load_from_env()?)
    }

    pub fn from_scraping_env(env: ScrapingEnv) -> anyhow::Result<Self> {
        let pages = match env.discovery_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => PageSource::Discover(url.trim().to_string()),
            None => {
                let pages: Vec<String> = env
                    .station_pages
                    .iter()
                    .map(|page| page.trim())
                    .filter(|page| !page.is_empty())
                    .map(String::from)
                    .collect();
                if pages.is_empty() {
                    bail!("no station pages configured and no discovery url set");
                }
                PageSource::Listed(pages)
            }
        };

        let output_format = match env.output_format.as_deref() {
            Some(format) => format.parse()?,
            None => OutputFormat::from_path(&env.output_path),
        };

        let failure_policy = if env.skip_failed_pages {
            FailurePolicy::SkipAndLog
        } else {
            FailurePolicy::Abort
        };

        Ok(Self {
            pages,
            output_path: env.output_path,
            output_format,
            failure_policy,
            request_timeout: Duration::from_secs(env.request_timeout_secs),
            user_agent: env.user_agent,
        })
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}
