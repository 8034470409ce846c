//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart::CartError;

/// API-level error type that maps to HTTP responses.
///
/// Running out of flash-sale stock is not an error; handlers answer it
/// with a 409 directly.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Login rejected.
    Unauthorized(String),
    /// Cart input validation error.
    Cart(CartError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Cart(err) => cart_error_to_response(err),
        };

        tracing::debug!(%status, error = %message, "request rejected");
        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn cart_error_to_response(err: CartError) -> (StatusCode, String) {
    match &err {
        CartError::InvalidToken | CartError::InvalidQuantity { .. } => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}
