// src/domain/listing.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Column headers of the listings table, in output order.
pub const LISTING_COLUMNS: [&str; 8] = [
    "Location",
    "Property Type",
    "Bedrooms",
    "Bathrooms",
    "Size (sqm)",
    "Amenities",
    "Price (KES)",
    "Listing Date",
];

const AMENITY_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyType {
    House,
    Apartment,
    Villa,
    Townhouse,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Villa,
        PropertyType::Townhouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Apartment => "Apartment",
            PropertyType::Villa => "Villa",
            PropertyType::Townhouse => "Townhouse",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown property type '{s}'"))
    }
}

/// One accepted listing. Only built once price and location are known.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub location: String,
    pub property_type: PropertyType,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub size_sqm: Option<f64>,
    pub amenities: BTreeSet<String>,
    pub price_kes: u64,
    pub listing_date: Option<NaiveDate>,
}

impl ListingRecord {
    /// Sorted, de-duplicated amenity tags joined with ", ".
    pub fn amenities_joined(&self) -> String {
        join_amenities(&self.amenities)
    }

    /// The row as written to the table, absent fields as empty cells.
    /// Two records with equal cells are the same row.
    pub fn cells(&self) -> [String; 8] {
        [
            self.location.clone(),
            self.property_type.to_string(),
            opt_cell(self.bedrooms),
            opt_cell(self.bathrooms),
            opt_cell(self.size_sqm),
            self.amenities_joined(),
            self.price_kes.to_string(),
            opt_cell(self.listing_date),
        ]
    }
}

pub fn join_amenities(amenities: &BTreeSet<String>) -> String {
    amenities
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(AMENITY_SEPARATOR)
}

pub fn split_amenities(joined: &str) -> BTreeSet<String> {
    joined
        .split(AMENITY_SEPARATOR.trim())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// A listings table row as read back from CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingRow {
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Property Type")]
    pub property_type: String,
    #[serde(rename = "Bedrooms")]
    pub bedrooms: Option<f64>,
    #[serde(rename = "Bathrooms")]
    pub bathrooms: Option<f64>,
    #[serde(rename = "Size (sqm)")]
    pub size_sqm: Option<f64>,
    #[serde(rename = "Amenities", default)]
    pub amenities: Option<String>,
    #[serde(rename = "Price (KES)")]
    pub price_kes: f64,
    #[serde(rename = "Listing Date", default)]
    pub listing_date: Option<String>,
}

impl TryFrom<ListingRow> for ListingRecord {
    type Error = String;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let location = row.location.trim().to_string();
        if location.is_empty() {
            return Err("Missing location".into());
        }

        if !(row.price_kes.is_finite() && row.price_kes >= 1.0) {
            return Err(format!("Invalid price {}", row.price_kes));
        }

        let property_type = row.property_type.parse::<PropertyType>()?;

        // integer columns with gaps come back as floats ("3.0")
        let bedrooms = row
            .bedrooms
            .filter(|b| b.is_finite() && *b >= 0.0)
            .map(|b| b as u32);

        let listing_date = row
            .listing_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(parse_listing_date);

        Ok(ListingRecord {
            location,
            property_type,
            bedrooms,
            bathrooms: row.bathrooms.filter(|b| b.is_finite() && *b >= 0.0),
            size_sqm: row.size_sqm.filter(|s| s.is_finite() && *s > 0.0),
            amenities: row
                .amenities
                .as_deref()
                .map(split_amenities)
                .unwrap_or_default(),
            price_kes: row.price_kes as u64,
            listing_date,
        })
    }
}

/// Accepts the ISO form written by this crate and the "12 March 2024"
/// form shown on listing pages.
pub fn parse_listing_date(text: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%d %B %Y", "%d %b %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ListingRecord {
        ListingRecord {
            location: "Kilimani".to_string(),
            property_type: PropertyType::Apartment,
            bedrooms: Some(3),
            bathrooms: Some(2.5),
            size_sqm: None,
            amenities: ["Pool", "Gym", "Borehole"]
                .into_iter()
                .map(String::from)
                .collect(),
            price_kes: 12_500_000,
            listing_date: NaiveDate::from_ymd_opt(2024, 3, 12),
        }
    }

    #[test]
    fn cells_render_absent_fields_empty() {
        let cells = record().cells();
        assert_eq!(cells[0], "Kilimani");
        assert_eq!(cells[1], "Apartment");
        assert_eq!(cells[2], "3");
        assert_eq!(cells[3], "2.5");
        assert_eq!(cells[4], "");
        assert_eq!(cells[5], "Borehole, Gym, Pool");
        assert_eq!(cells[6], "12500000");
        assert_eq!(cells[7], "2024-03-12");
    }

    #[test]
    fn property_type_parses_case_insensitively() {
        assert_eq!("villa".parse::<PropertyType>(), Ok(PropertyType::Villa));
        assert_eq!(" Townhouse ".parse::<PropertyType>(), Ok(PropertyType::Townhouse));
        assert!("Castle".parse::<PropertyType>().is_err());
    }

    #[test]
    fn row_with_float_counts_converts() {
        let row = ListingRow {
            location: " Karen ".to_string(),
            property_type: "House".to_string(),
            bedrooms: Some(4.0),
            bathrooms: None,
            size_sqm: Some(0.0),
            amenities: Some("Gym, Pool".to_string()),
            price_kes: 45_000_000.0,
            listing_date: Some("3 Jan 2025".to_string()),
        };

        let rec = ListingRecord::try_from(row).unwrap();
        assert_eq!(rec.location, "Karen");
        assert_eq!(rec.bedrooms, Some(4));
        assert_eq!(rec.size_sqm, None);
        assert_eq!(rec.amenities.len(), 2);
        assert_eq!(rec.listing_date, NaiveDate::from_ymd_opt(2025, 1, 3));
    }

    #[test]
    fn row_without_price_is_rejected() {
        let row = ListingRow {
            location: "Karen".to_string(),
            property_type: "House".to_string(),
            bedrooms: None,
            bathrooms: None,
            size_sqm: None,
            amenities: None,
            price_kes: 0.0,
            listing_date: None,
        };
        assert!(ListingRecord::try_from(row).is_err());
    }
}
