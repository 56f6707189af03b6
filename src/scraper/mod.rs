pub mod crawl;
pub mod extract;
pub mod models;
mod scraper;
mod scraper_error;
mod visited;

pub use crawl::{scrape_all, Category, CategoryCrawler, Pacing};
pub use self::scraper::{HttpPageSource, PageSource};
pub use scraper_error::ScraperError;
pub use visited::VisitedSet;
