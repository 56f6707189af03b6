pub mod errors;
pub mod html;
pub mod xlsx;

pub use errors::{error_to_response, ResultResp};

// Normal HTML response
pub use html::html_response;
pub use xlsx::{csv_response, xlsx_response};
