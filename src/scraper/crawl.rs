// crawl.rs
use crate::domain::listing::{ListingRecord, PropertyType};
use crate::scraper::extract::extract_listing;
use crate::scraper::{PageSource, ScraperError, VisitedSet};
use scraper::{Html, Selector};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const CARD_SELECTOR: &str =
    r#"div[class*="listing"], div[class*="property"], div[class*="card"]"#;
const DETAIL_LINK_SELECTOR: &str = r#"a[href*="/listings/"]"#;

/// One property category: its paginated index and the label its records get.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub base_url: String,
    pub property_type: PropertyType,
}

impl Category {
    pub fn new(base_url: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            base_url: base_url.into(),
            property_type,
        }
    }
}

/// Fixed pauses after each page and each detail fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pacing {
    pub page_delay: Duration,
    pub detail_delay: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub pages_visited: usize,
    pub pages_failed: usize,
    pub cards_seen: usize,
    pub duplicates_skipped: usize,
    pub details_unreachable: usize,
    pub records_rejected: usize,
    pub records_accepted: usize,
}

#[derive(Debug, Default)]
pub struct CategoryCrawl {
    pub records: Vec<ListingRecord>,
    pub stats: CrawlStats,
}

pub struct CategoryCrawler<'a, S: PageSource> {
    source: &'a S,
    pacing: Pacing,
}

impl<'a, S: PageSource> CategoryCrawler<'a, S> {
    pub fn new(source: &'a S, pacing: Pacing) -> Self {
        Self { source, pacing }
    }

    /// Crawls pages 1..=stop_page of one category until `max_records`
    /// records are accepted. Failed pages and cards are logged and skipped.
    pub fn crawl(
        &self,
        category: &Category,
        max_records: usize,
        stop_page: u32,
        visited: &mut VisitedSet,
    ) -> CategoryCrawl {
        let mut out = CategoryCrawl::default();
        let label = category.property_type;

        for page in 1..=stop_page {
            if out.records.len() >= max_records {
                break;
            }

            let url = match page_url(&category.base_url, page) {
                Ok(u) => u,
                Err(e) => {
                    warn!(%label, "cannot build page URL: {e}");
                    break;
                }
            };

            info!(%label, page, %url, "📄 Scraping page");
            out.stats.pages_visited += 1;

            let html = match self.source.fetch(&url) {
                Ok(h) => h,
                Err(e) => {
                    warn!(%label, page, "⚠️ page skipped: {e}");
                    out.stats.pages_failed += 1;
                    continue;
                }
            };
            pause(self.pacing.page_delay);

            let links = match listing_links(&html, &url) {
                Ok(l) => l,
                Err(e) => {
                    warn!(%label, page, "⚠️ page skipped: {e}");
                    out.stats.pages_failed += 1;
                    continue;
                }
            };
            info!(%label, page, cards = links.len(), "found listing cards");

            for link in links {
                if out.records.len() >= max_records {
                    break;
                }
                out.stats.cards_seen += 1;

                if !visited.check_and_mark(&link) {
                    debug!(%link, "already visited");
                    out.stats.duplicates_skipped += 1;
                    continue;
                }

                let detail = match self.source.fetch(&link) {
                    Ok(d) => d,
                    Err(e) => {
                        warn!(%link, "detail page unreachable: {e}");
                        out.stats.details_unreachable += 1;
                        continue;
                    }
                };
                pause(self.pacing.detail_delay);

                let fields = extract_listing(&detail);
                let reason = fields.rejection_reason();
                match fields.into_record(label) {
                    Some(record) => {
                        out.records.push(record);
                        out.stats.records_accepted += 1;
                        info!(%label, collected = out.records.len(), "collected record");
                    }
                    None => {
                        debug!(%link, reason = reason.unwrap_or("invalid"), "record rejected");
                        out.stats.records_rejected += 1;
                    }
                }
            }
        }

        info!(
            %label,
            pages = out.stats.pages_visited,
            accepted = out.stats.records_accepted,
            duplicates = out.stats.duplicates_skipped,
            unreachable = out.stats.details_unreachable,
            rejected = out.stats.records_rejected,
            "✅ category done"
        );

        out
    }
}

/// Crawls every category in order with one shared visited set. The total
/// quota is split evenly between categories.
pub fn scrape_all<S: PageSource>(
    source: &S,
    categories: &[Category],
    max_records: usize,
    stop_page: u32,
    pacing: Pacing,
) -> Vec<CategoryCrawl> {
    if categories.is_empty() {
        return Vec::new();
    }

    let per_category = max_records / categories.len();
    let crawler = CategoryCrawler::new(source, pacing);
    let mut visited = VisitedSet::new();

    categories
        .iter()
        .map(|category| crawler.crawl(category, per_category, stop_page, &mut visited))
        .collect()
}

/// `base_url` with `page=<n>` appended to its query.
pub fn page_url(base_url: &str, page: u32) -> Result<String, ScraperError> {
    let mut url = Url::parse(base_url)?;
    url.query_pairs_mut().append_pair("page", &page.to_string());
    Ok(url.into())
}

/// Absolute detail-page URLs of the cards on an index page, in page order.
/// Cards without a detail link are left out.
pub fn listing_links(html: &str, page_url: &str) -> Result<Vec<String>, ScraperError> {
    let base = Url::parse(page_url)?;
    let card_sel =
        Selector::parse(CARD_SELECTOR).map_err(|e| ScraperError::HtmlParse(e.to_string()))?;
    let link_sel = Selector::parse(DETAIL_LINK_SELECTOR)
        .map_err(|e| ScraperError::HtmlParse(e.to_string()))?;

    let document = Html::parse_document(html);

    let links = document
        .select(&card_sel)
        .filter_map(|card| card.select(&link_sel).next())
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .map(String::from)
        .collect();

    Ok(links)
}

fn pause(d: Duration) {
    if !d.is_zero() {
        std::thread::sleep(d);
    }
}
