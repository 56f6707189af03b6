pub mod dashboard;
pub mod error;
pub mod predict;

pub use dashboard::{dashboard_page, DashboardVm};
pub use error::error_page;
pub use predict::{predict_page, PredictVm};
