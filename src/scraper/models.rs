use crate::domain::listing::{ListingRecord, PropertyType};
use chrono::NaiveDate;
use std::collections::BTreeSet;

// detail page
//  ├── body text      -> price_kes
//  ├── h1             -> location
//  ├── span*          -> bedrooms / bathrooms / size_sqm
//  ├── "Created At"   -> listing_date
//  ├── "Features And Amenities" li*  ┐
//  └── "Utilities" span*             ┘-> amenities

/// Everything the extractor could resolve from one detail page.
/// Each field is found (or not) independently of the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFields {
    pub price_kes: Option<u64>,
    pub location: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub size_sqm: Option<f64>,
    pub amenities: BTreeSet<String>,
    pub listing_date: Option<NaiveDate>,
}

impl ListingFields {
    /// Promotes the fields to a record. Returns `None` unless both price
    /// and location resolved.
    pub fn into_record(self, property_type: PropertyType) -> Option<ListingRecord> {
        let price_kes = self.price_kes.filter(|p| *p > 0)?;
        let location = self.location.filter(|l| !l.trim().is_empty())?;

        Some(ListingRecord {
            location,
            property_type,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            size_sqm: self.size_sqm,
            amenities: self.amenities,
            price_kes,
            listing_date: self.listing_date,
        })
    }

    /// Short reason used when a record is dropped.
    pub fn rejection_reason(&self) -> Option<&'static str> {
        let location = self.location.as_deref().filter(|l| !l.trim().is_empty());
        match (self.price_kes.filter(|p| *p > 0), location) {
            (None, None) => Some("missing price and location"),
            (None, _) => Some("missing price"),
            (_, None) => Some("missing location"),
            _ => None,
        }
    }
}
