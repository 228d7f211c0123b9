mod extract_error;
mod text_manipulators;

pub mod config;
pub mod page_discovery;
pub mod pipeline;
pub mod price_decoder;
pub mod requests;
pub mod scraping_context;
pub mod sink;
pub mod station;
pub mod station_scraper;

pub use config::{PageSource, ScrapingConfig};
pub use extract_error::{DecodeError, ExtractError};
pub use page_discovery::PageDiscovery;
pub use pipeline::{FailurePolicy, PageError, PageOutcome, ScrapeReport};
pub use requests::{PageFetcher, RequestClient, StaticPages};
pub use scraping_context::ScrapingContext;
pub use sink::OutputFormat;
pub use station::{PriceQuote, StationRecord, StationRow};
pub use station_scraper::{GradeColumn, StationScraper};
