// src/predict/model.rs

use crate::predict::PredictError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// A trained price model: aligned feature vector in, price out.
pub trait PriceModel {
    /// Column names the model was trained on, in input order.
    fn feature_columns(&self) -> &[String];

    /// Mean absolute error measured at training time.
    fn error_margin(&self) -> f64;

    fn predict(&self, features: &[f64]) -> f64;
}

/// Exported linear model artifact.
///
/// ```json
/// {
///   "features": ["Bedrooms", "Bathrooms", "Size (sqm)", "amenity_score", "Location_karen"],
///   "coefficients": { "Bedrooms": 1500000.0, "Location_karen": 9000000.0 },
///   "intercept": 2000000.0,
///   "mae": 3500000.0
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    features: Vec<String>,
    #[serde(default)]
    coefficients: HashMap<String, f64>,
    #[serde(default)]
    intercept: f64,
    mae: f64,

    #[serde(skip)]
    weights: Vec<f64>,
}

impl LinearModel {
    pub fn new(
        features: Vec<String>,
        coefficients: HashMap<String, f64>,
        intercept: f64,
        mae: f64,
    ) -> Self {
        let mut model = Self {
            features,
            coefficients,
            intercept,
            mae,
            weights: Vec::new(),
        };
        model.resolve_weights();
        model
    }

    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        let mut model: LinearModel =
            serde_json::from_str(json).map_err(|e| PredictError::ModelLoad(e.to_string()))?;

        if model.features.is_empty() {
            return Err(PredictError::ModelLoad("artifact lists no features".into()));
        }
        if !model.mae.is_finite() || model.mae < 0.0 {
            return Err(PredictError::ModelLoad(format!("bad mae {}", model.mae)));
        }

        model.resolve_weights();
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PredictError::ModelLoad(format!("{}: {e}", path.display())))?;
        let model = Self::from_json(&json)?;
        info!(path = %path.display(), features = model.features.len(), "🤖 model loaded");
        Ok(model)
    }

    // Columns without a coefficient weigh zero.
    fn resolve_weights(&mut self) {
        self.weights = self
            .features
            .iter()
            .map(|f| self.coefficients.get(f).copied().unwrap_or(0.0))
            .collect();
    }
}

impl PriceModel for LinearModel {
    fn feature_columns(&self) -> &[String] {
        &self.features
    }

    fn error_margin(&self) -> f64 {
        self.mae
    }

    fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}
