// src/domain/clean.rs

use crate::domain::dataset::{Dataset, DatasetError};
use crate::domain::listing::{ListingRecord, PropertyType, LISTING_COLUMNS};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

const SQFT_PER_SQM: f64 = 10.7639;

/// A listing with normalized location and the columns the dashboards use.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanListing {
    pub record: ListingRecord,
    pub price_per_sqft: Option<f64>,
    pub amenity_score: u32,
}

impl CleanListing {
    pub fn from_record(mut record: ListingRecord) -> Self {
        record.location = normalize_location(&record.location);

        let price_per_sqft = record
            .size_sqm
            .filter(|s| *s > 0.0)
            .map(|s| round2(record.price_kes as f64 / (s * SQFT_PER_SQM)));

        let amenity_score = record.amenities.len() as u32;

        Self {
            record,
            price_per_sqft,
            amenity_score,
        }
    }

    pub fn location(&self) -> &str {
        &self.record.location
    }

    pub fn property_type(&self) -> PropertyType {
        self.record.property_type
    }

    pub fn price(&self) -> u64 {
        self.record.price_kes
    }

    pub fn listing_date(&self) -> Option<NaiveDate> {
        self.record.listing_date
    }

    /// Base columns followed by price_per_sqft and amenity_score.
    pub fn cells(&self) -> Vec<String> {
        let mut cells = self.record.cells().to_vec();
        cells.push(self.price_per_sqft.map(|p| p.to_string()).unwrap_or_default());
        cells.push(self.amenity_score.to_string());
        cells
    }
}

pub fn normalize_location(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Cleans a raw table: normalizes every row and drops rows that become
/// identical after normalization.
pub fn clean_dataset(raw: &Dataset) -> Vec<CleanListing> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for record in raw.records() {
        let clean = CleanListing::from_record(record.clone());
        if seen.insert(clean.cells()) {
            out.push(clean);
        }
    }

    info!(
        raw = raw.len(),
        clean = out.len(),
        "🧹 cleaned listings"
    );
    out
}

pub fn write_clean_csv(listings: &[CleanListing], path: &Path) -> Result<(), DatasetError> {
    let mut header: Vec<&str> = LISTING_COLUMNS.to_vec();
    header.push("price_per_sqft");
    header.push("amenity_score");

    crate::domain::dataset::write_table_atomic(path, &header, listings.iter().map(|l| l.cells()))?;
    info!(rows = listings.len(), path = %path.display(), "💾 clean table written");
    Ok(())
}

/// Loads a table for the dashboards. Works on both raw and clean files:
/// derived columns are recomputed from the base columns either way.
pub fn read_clean_csv(path: &Path) -> Result<Vec<CleanListing>, DatasetError> {
    let raw = Dataset::read_csv(path)?;
    let listings: Vec<CleanListing> = raw
        .records()
        .iter()
        .cloned()
        .map(CleanListing::from_record)
        .collect();

    if listings.is_empty() {
        warn!(path = %path.display(), "no usable rows in table");
    }

    Ok(listings)
}
