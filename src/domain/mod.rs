pub mod clean;
pub mod dataset;
pub mod listing;
pub mod market;
