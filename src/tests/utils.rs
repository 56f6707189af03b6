use crate::domain::clean::CleanListing;
use crate::domain::listing::{ListingRecord, PropertyType};
use crate::predict::LinearModel;
use crate::router::AppState;
use crate::scraper::{PageSource, ScraperError};
use astra::{Body, Response};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Read;

/// In-memory pages keyed by URL. Unknown URLs fail like a dead link.
#[derive(Default)]
pub struct FixturePages {
    pages: HashMap<String, String>,
    pub fetched: RefCell<Vec<String>>,
}

impl FixturePages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }
}

impl PageSource for FixturePages {
    fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        self.fetched.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScraperError::Network(format!("timed out loading {url}")))
    }
}

/// Index page with one card per detail path.
pub fn index_page(detail_paths: &[&str]) -> String {
    let cards: String = detail_paths
        .iter()
        .map(|p| format!(r#"<div class="listing-card"><a href="{p}">View</a></div>"#))
        .collect();
    format!("<html><body><h1>Results</h1>{cards}</body></html>")
}

/// Detail page; `price` of `None` leaves the price out entirely.
pub fn detail_page(heading: &str, price: Option<&str>, bedrooms: u32) -> String {
    let price = price
        .map(|p| format!("<span class=\"price\">KSh {p}</span>"))
        .unwrap_or_default();
    format!(
        r#"<html><body>
            <h1>{heading}</h1>
            {price}
            <span>{bedrooms} Bedrooms</span>
            <span>2 Bathrooms</span>
            <p>Created At 1 June 2024</p>
            <h2>Features And Amenities</h2>
            <ul><li>Gym</li><li>Borehole</li></ul>
        </body></html>"#
    )
}

pub fn clean_listing(location: &str, property_type: PropertyType, price: u64) -> CleanListing {
    CleanListing::from_record(ListingRecord {
        location: location.to_string(),
        property_type,
        bedrooms: Some(3),
        bathrooms: Some(2.0),
        size_sqm: Some(150.0),
        amenities: ["Gym".to_string()].into_iter().collect(),
        price_kes: price,
        listing_date: NaiveDate::from_ymd_opt(2024, 6, 1),
    })
}

pub fn test_state(with_model: bool) -> AppState {
    let listings = vec![
        clean_listing("Karen", PropertyType::House, 60_000_000),
        clean_listing("Karen", PropertyType::Villa, 80_000_000),
        clean_listing("Kilimani", PropertyType::Apartment, 12_000_000),
    ];

    let model = with_model.then(|| {
        LinearModel::from_json(
            r#"{
                "features": ["Bedrooms", "Bathrooms", "Size (sqm)", "amenity_score", "Location_karen"],
                "coefficients": { "Bedrooms": 1000000.0, "Location_karen": 10000000.0 },
                "intercept": 5000000.0,
                "mae": 2000000.0
            }"#,
        )
        .expect("fixture model")
    });

    AppState::new(listings, model)
}

pub fn body_string(mut resp: Response) -> String {
    let mut body_bytes = Vec::new();
    resp.body_mut()
        .reader()
        .read_to_end(&mut body_bytes)
        .unwrap();
    String::from_utf8(body_bytes).unwrap()
}

pub fn get(uri: &str) -> astra::Request {
    http::Request::builder()
        .method(http::Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
