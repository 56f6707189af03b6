pub mod features;
pub mod model;

pub use features::{predict_price, Prediction, PredictionInput, KNOWN_LOCATIONS};
pub use model::{LinearModel, PriceModel};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Model load error: {0}")]
    ModelLoad(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
