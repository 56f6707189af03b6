// config.rs
use crate::domain::listing::PropertyType;
use crate::scraper::{Category, Pacing};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MAX_RECORDS: usize = 800;
pub const DEFAULT_STOP_PAGE: u32 = 124;
pub const DEFAULT_OUTPUT: &str = "data/nairobi_combined_all_property_types.csv";
pub const DEFAULT_CLEAN_OUTPUT: &str = "data/clean_listings.csv";
pub const DEFAULT_MODEL: &str = "model.json";

/// Category entry points, crawled in this order.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("https://www.buyrentkenya.com/houses-for-sale", PropertyType::House),
        Category::new(
            "https://www.buyrentkenya.com/flats-apartments-for-sale/nairobi",
            PropertyType::Apartment,
        ),
        Category::new("https://www.buyrentkenya.com/villas-for-sale", PropertyType::Villa),
        Category::new(
            "https://www.buyrentkenya.com/townhouses-for-sale",
            PropertyType::Townhouse,
        ),
    ]
}

#[derive(Debug, Parser)]
#[command(name = "nairobi_listings", about = "Scrape, clean and explore Nairobi property listings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl every category and write the listings table
    Scrape(ScrapeArgs),
    /// Normalize a listings table and add the derived columns
    Clean(CleanArgs),
    /// Serve the market dashboard and price predictor
    Serve(ServeArgs),
    /// Predict one price from the command line
    Predict(PredictArgs),
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Total record quota, split evenly across categories
    #[arg(long, env = "LISTINGS_MAX_RECORDS", default_value_t = DEFAULT_MAX_RECORDS)]
    pub max_records: usize,

    /// Last index page to visit per category
    #[arg(long, env = "LISTINGS_STOP_PAGE", default_value_t = DEFAULT_STOP_PAGE)]
    pub stop_page: u32,

    #[arg(long, env = "LISTINGS_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    #[arg(long, env = "LISTINGS_PAGE_DELAY_MS", default_value_t = 3000)]
    pub page_delay_ms: u64,

    #[arg(long, env = "LISTINGS_DETAIL_DELAY_MS", default_value_t = 2000)]
    pub detail_delay_ms: u64,

    #[arg(long, env = "LISTINGS_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, env = "LISTINGS_MAX_ATTEMPTS", default_value_t = 3)]
    pub max_attempts: u64,
}

impl ScrapeArgs {
    pub fn pacing(&self) -> Pacing {
        Pacing {
            page_delay: Duration::from_millis(self.page_delay_ms),
            detail_delay: Duration::from_millis(self.detail_delay_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub input: PathBuf,

    #[arg(long, default_value = DEFAULT_CLEAN_OUTPUT)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = "LISTINGS_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    #[arg(long, env = "LISTINGS_DATA", default_value = DEFAULT_CLEAN_OUTPUT)]
    pub data: PathBuf,

    #[arg(long, env = "LISTINGS_MODEL", default_value = DEFAULT_MODEL)]
    pub model: PathBuf,

    #[arg(long, env = "LISTINGS_WORKERS", default_value_t = 8)]
    pub workers: usize,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    #[arg(long)]
    pub location: String,

    #[arg(long)]
    pub bedrooms: u32,

    #[arg(long)]
    pub bathrooms: u32,

    /// Size in square metres
    #[arg(long)]
    pub size: u32,

    #[arg(long, default_value_t = 10)]
    pub amenity_score: u32,

    #[arg(long, env = "LISTINGS_MODEL", default_value = DEFAULT_MODEL)]
    pub model: PathBuf,
}
