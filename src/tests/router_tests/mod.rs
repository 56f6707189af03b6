mod dashboard_tests;
mod download_tests;
mod predict_tests;
