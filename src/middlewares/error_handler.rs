// Start of file: /src/middlewares/error_handler.rs

use axum::{http::StatusCode, response::IntoResponse, BoxError};
use http_body_util::LengthLimitError;

// * Maps errors escaping the inner tower layers onto HTTP responses.
// * Sits between the logging middleware and the timeout layer, so the
// * responses built here still go through the post-log/flush path.
pub async fn handle_global_error(err: BoxError) -> impl IntoResponse {
    // Check for body length limit errors using the dereferenced error
    if let Some(e) = find_cause::<LengthLimitError>(&*err) {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Request body too large: {}", e),
        );
    }

    // Check for timeout errors
    if let Some(e) = err.downcast_ref::<tower::timeout::error::Elapsed>() {
        return (
            StatusCode::REQUEST_TIMEOUT,
            format!("Request timeout: {}", e),
        );
    }

    // Fallback to generic error
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Unhandled internal error: {}", err),
    )
}

// Walks the source chain looking for a typed cause.
fn find_cause<T: std::error::Error + 'static>(err: &dyn std::error::Error) -> Option<&T> {
    let mut source = err.source();
    while let Some(s) = source {
        if let Some(typed) = s.downcast_ref::<T>() {
            return Some(typed);
        }
        source = s.source();
    }
    None
}

// End of file: /src/middlewares/error_handler.rs
