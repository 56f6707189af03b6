use astra::Response;
// errors.rs
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, bad query input) or downstream layers (export, model).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Prediction model is not loaded")]
    ModelUnavailable,
    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),
    #[error("Export Error: {0}")]
    ExportError(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::ModelUnavailable => 503,
            ServerError::XlsxError(_) | ServerError::ExportError(_) | ServerError::InternalError => {
                500
            }
        }
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
