// src/predict/features.rs

use crate::domain::clean::normalize_location;
use crate::predict::{PredictError, PriceModel};
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Location choices offered by the prediction form.
pub const KNOWN_LOCATIONS: [&str; 12] = [
    "lavington",
    "kilimani",
    "westlands area",
    "kileleshwa",
    "runda",
    "karen",
    "loresho",
    "kitisuru",
    "riverside",
    "langata",
    "lower kabete",
    "other",
];

const BEDROOMS: RangeInclusive<u32> = 1..=10;
const BATHROOMS: RangeInclusive<u32> = 1..=10;
const SIZE_SQM: RangeInclusive<u32> = 20..=2000;
const AMENITY_SCORE: RangeInclusive<u32> = 0..=30;

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionInput {
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub size_sqm: u32,
    pub amenity_score: u32,
}

impl Default for PredictionInput {
    fn default() -> Self {
        Self {
            location: "lavington".to_string(),
            bedrooms: 3,
            bathrooms: 2,
            size_sqm: 120,
            amenity_score: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub price: f64,
    pub lower: f64,
    pub upper: f64,
}

impl PredictionInput {
    /// Checks every field against the form's bounds. The location is
    /// normalized the same way the training table was.
    pub fn validate(mut self) -> Result<Self, PredictError> {
        self.location = normalize_location(&self.location);
        if !KNOWN_LOCATIONS.contains(&self.location.as_str()) {
            return Err(PredictError::InvalidInput(format!(
                "unknown location '{}'",
                self.location
            )));
        }

        check("bedrooms", self.bedrooms, BEDROOMS)?;
        check("bathrooms", self.bathrooms, BATHROOMS)?;
        check("size (sqm)", self.size_sqm, SIZE_SQM)?;
        check("amenity score", self.amenity_score, AMENITY_SCORE)?;

        Ok(self)
    }

    /// Named features before alignment, location one-hot encoded.
    pub fn named_features(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("Bedrooms".to_string(), self.bedrooms as f64),
            ("Bathrooms".to_string(), self.bathrooms as f64),
            ("Size (sqm)".to_string(), self.size_sqm as f64),
            ("amenity_score".to_string(), self.amenity_score as f64),
            (format!("Location_{}", self.location), 1.0),
        ])
    }
}

fn check(name: &str, value: u32, range: RangeInclusive<u32>) -> Result<(), PredictError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(PredictError::InvalidInput(format!(
            "{name} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        )))
    }
}

/// Orders features by `columns`; columns the input doesn't produce get 0,
/// features the model doesn't know are dropped.
pub fn align_features(named: &HashMap<String, f64>, columns: &[String]) -> Vec<f64> {
    columns
        .iter()
        .map(|c| named.get(c).copied().unwrap_or(0.0))
        .collect()
}

/// Validates, aligns and runs the model. The range is ± the model's MAE.
pub fn predict_price<M: PriceModel + ?Sized>(
    model: &M,
    input: PredictionInput,
) -> Result<Prediction, PredictError> {
    let input = input.validate()?;
    let features = align_features(&input.named_features(), model.feature_columns());

    let price = model.predict(&features);
    let margin = model.error_margin();

    Ok(Prediction {
        price,
        lower: price - margin,
        upper: price + margin,
    })
}
