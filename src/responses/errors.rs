use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use tracing::warn;

pub use crate::errors::ResultResp;

/// Convert a ServerError into a proper HTML response
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        warn!(status, "request failed: {err}");
    }
    html_error_response(status, &err.to_string())
}

/// Build an HTML error page
pub fn html_error_response(status: u16, message: &str) -> Response {
    let page = crate::templates::pages::error_page(status, message);

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(page.into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
