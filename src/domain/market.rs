// src/domain/market.rs

use crate::domain::clean::CleanListing;
use crate::domain::listing::PropertyType;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Which listings the dashboard looks at. Empty sets mean "everything".
#[derive(Debug, Clone, Default)]
pub struct MarketFilter {
    pub locations: BTreeSet<String>,
    pub property_types: BTreeSet<PropertyType>,
}

impl MarketFilter {
    pub fn matches(&self, listing: &CleanListing) -> bool {
        (self.locations.is_empty() || self.locations.contains(listing.location()))
            && (self.property_types.is_empty()
                || self.property_types.contains(&listing.property_type()))
    }

    pub fn apply<'a>(&self, listings: &'a [CleanListing]) -> Vec<&'a CleanListing> {
        listings.iter().filter(|l| self.matches(l)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub total_listings: usize,
    pub median_price: Option<f64>,
    pub mean_price_per_sqft: Option<f64>,
    pub median_bedrooms: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AmenityTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for AmenityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AmenityTier::Low => "Low",
            AmenityTier::Medium => "Medium",
            AmenityTier::High => "High",
        })
    }
}

/// Everything the analytics page shows, computed over one filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketReport {
    pub overview: Overview,
    pub median_price_by_location: Vec<(String, f64)>,
    pub monthly_trend: Vec<(String, f64)>,
    pub price_per_sqft_by_location: Vec<(String, f64)>,
    /// `None` when amenity scores don't vary enough to split into tiers.
    pub amenity_tiers: Option<Vec<(AmenityTier, f64)>>,
}

impl MarketReport {
    pub fn build(listings: &[&CleanListing]) -> Self {
        Self {
            overview: overview(listings),
            median_price_by_location: median_price_by_location(listings),
            monthly_trend: monthly_trend(listings),
            price_per_sqft_by_location: price_per_sqft_by_location(listings),
            amenity_tiers: amenity_tiers(listings),
        }
    }
}

pub fn overview(listings: &[&CleanListing]) -> Overview {
    let prices: Vec<f64> = listings.iter().map(|l| l.price() as f64).collect();
    let ppsf: Vec<f64> = listings.iter().filter_map(|l| l.price_per_sqft).collect();
    let bedrooms: Vec<f64> = listings
        .iter()
        .filter_map(|l| l.record.bedrooms)
        .map(f64::from)
        .collect();

    Overview {
        total_listings: listings.len(),
        median_price: median(&prices),
        mean_price_per_sqft: mean(&ppsf),
        median_bedrooms: median(&bedrooms),
    }
}

/// Median price per location, highest first.
pub fn median_price_by_location(listings: &[&CleanListing]) -> Vec<(String, f64)> {
    let groups = group_by(listings, |l| Some((l.location().to_string(), l.price() as f64)));
    sorted_desc(medians(groups))
}

/// Median price per listing month ("YYYY-MM"), oldest first.
pub fn monthly_trend(listings: &[&CleanListing]) -> Vec<(String, f64)> {
    let groups = group_by(listings, |l| {
        l.listing_date()
            .map(|d| (d.format("%Y-%m").to_string(), l.price() as f64))
    });
    medians(groups)
}

/// Median price per sqft per location, highest first.
pub fn price_per_sqft_by_location(listings: &[&CleanListing]) -> Vec<(String, f64)> {
    let groups = group_by(listings, |l| {
        l.price_per_sqft.map(|p| (l.location().to_string(), p))
    });
    sorted_desc(medians(groups))
}

/// Splits listings into three equal-frequency amenity bands and reports
/// the median price of each non-empty band.
pub fn amenity_tiers(listings: &[&CleanListing]) -> Option<Vec<(AmenityTier, f64)>> {
    let scores: Vec<f64> = listings.iter().map(|l| l.amenity_score as f64).collect();

    let distinct: BTreeSet<u32> = listings.iter().map(|l| l.amenity_score).collect();
    if distinct.len() <= 1 {
        return None;
    }

    let low_edge = quantile(&scores, 1.0 / 3.0)?;
    let mid_edge = quantile(&scores, 2.0 / 3.0)?;

    let mut groups: BTreeMap<AmenityTier, Vec<f64>> = BTreeMap::new();
    for l in listings {
        let score = l.amenity_score as f64;
        let tier = if score <= low_edge {
            AmenityTier::Low
        } else if score <= mid_edge {
            AmenityTier::Medium
        } else {
            AmenityTier::High
        };
        groups.entry(tier).or_default().push(l.price() as f64);
    }

    Some(
        groups
            .into_iter()
            .filter_map(|(tier, prices)| median(&prices).map(|m| (tier, m)))
            .collect(),
    )
}

/// Distinct locations, for the filter controls.
pub fn locations(listings: &[CleanListing]) -> Vec<String> {
    listings
        .iter()
        .map(|l| l.location().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn group_by<F>(listings: &[&CleanListing], key_value: F) -> BTreeMap<String, Vec<f64>>
where
    F: Fn(&CleanListing) -> Option<(String, f64)>,
{
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (key, value) in listings.iter().filter_map(|l| key_value(*l)) {
        groups.entry(key).or_default().push(value);
    }
    groups
}

fn medians(groups: BTreeMap<String, Vec<f64>>) -> Vec<(String, f64)> {
    groups
        .into_iter()
        .filter_map(|(k, values)| median(&values).map(|m| (k, m)))
        .collect()
}

fn sorted_desc(mut rows: Vec<(String, f64)>) -> Vec<(String, f64)> {
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Linear-interpolated quantile, `q` in [0, 1].
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingRecord;
    use chrono::NaiveDate;

    fn listing(
        location: &str,
        property_type: PropertyType,
        price: u64,
        size: Option<f64>,
        amenities: usize,
        date: Option<(i32, u32, u32)>,
    ) -> CleanListing {
        CleanListing::from_record(ListingRecord {
            location: location.to_string(),
            property_type,
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            size_sqm: size,
            amenities: (0..amenities).map(|i| format!("a{i}")).collect(),
            price_kes: price,
            listing_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        })
    }

    fn sample() -> Vec<CleanListing> {
        vec![
            listing("Karen", PropertyType::House, 60_000_000, Some(400.0), 6, Some((2024, 1, 5))),
            listing("Karen", PropertyType::Villa, 80_000_000, Some(500.0), 9, Some((2024, 1, 20))),
            listing("Kilimani", PropertyType::Apartment, 12_000_000, Some(120.0), 2, Some((2024, 2, 2))),
            listing("Kilimani", PropertyType::Apartment, 14_000_000, None, 3, None),
            listing("Runda", PropertyType::House, 90_000_000, Some(600.0), 0, Some((2023, 12, 1))),
        ]
    }

    #[test]
    fn median_and_quantiles() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(quantile(&[0.0, 10.0], 1.0 / 3.0).map(|v| v.round()), Some(3.0));
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }

    #[test]
    fn filter_by_location_and_type() {
        let data = sample();
        let filter = MarketFilter {
            locations: BTreeSet::from(["karen".to_string()]),
            property_types: BTreeSet::from([PropertyType::Villa]),
        };
        let view = filter.apply(&data);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].price(), 80_000_000);

        assert_eq!(MarketFilter::default().apply(&data).len(), 5);
    }

    #[test]
    fn overview_kpis() {
        let data = sample();
        let view = MarketFilter::default().apply(&data);
        let o = overview(&view);
        assert_eq!(o.total_listings, 5);
        assert_eq!(o.median_price, Some(60_000_000.0));
        assert_eq!(o.median_bedrooms, Some(3.0));
        assert!(o.mean_price_per_sqft.is_some());
    }

    #[test]
    fn location_medians_sorted_high_to_low() {
        let data = sample();
        let view = MarketFilter::default().apply(&data);
        let rows = median_price_by_location(&view);
        assert_eq!(
            rows,
            vec![
                ("runda".to_string(), 90_000_000.0),
                ("karen".to_string(), 70_000_000.0),
                ("kilimani".to_string(), 13_000_000.0),
            ]
        );

        // the undated, unsized Kilimani row is left out of these
        let ppsf = price_per_sqft_by_location(&view);
        assert_eq!(ppsf.len(), 3);
    }

    #[test]
    fn monthly_trend_in_month_order() {
        let data = sample();
        let view = MarketFilter::default().apply(&data);
        let months: Vec<String> = monthly_trend(&view).into_iter().map(|(m, _)| m).collect();
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn amenity_tiers_need_variation() {
        let data = sample();
        let view = MarketFilter::default().apply(&data);
        let tiers = amenity_tiers(&view).unwrap();
        // scores 0,2,3,6,9 -> edges ~2.33 and 5.0
        assert_eq!(
            tiers,
            vec![
                (AmenityTier::Low, 51_000_000.0),
                (AmenityTier::Medium, 14_000_000.0),
                (AmenityTier::High, 70_000_000.0),
            ]
        );

        let flat = vec![
            listing("Karen", PropertyType::House, 1, None, 2, None),
            listing("Runda", PropertyType::House, 2, None, 2, None),
        ];
        let view: Vec<&CleanListing> = flat.iter().collect();
        assert_eq!(amenity_tiers(&view), None);
    }
}
