//! API error types with HTTP response mapping.
//!
//! Every error leaves the server as `{"error": {"kind", "message"}}`
//! with a machine-readable kind, so clients can branch without parsing
//! human-readable text.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::CartError;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Store or domain rule failure.
    Store(StoreError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Store(err) => store_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg)
            }
        };

        let body = serde_json::json!({ "error": { "kind": kind, "message": message } });
        (status, axum::Json(body)).into_response()
    }
}

fn store_error_to_response(err: StoreError) -> (StatusCode, &'static str, String) {
    let message = err.to_string();
    match &err {
        StoreError::CategoryNotFound(_) => (StatusCode::NOT_FOUND, "category_not_found", message),
        StoreError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "product_not_found", message),
        StoreError::CartNotFound(_) => (StatusCode::NOT_FOUND, "cart_not_found", message),
        StoreError::CustomerNotFound(_) => (StatusCode::NOT_FOUND, "customer_not_found", message),
        StoreError::Cart(cart_err) => match cart_err {
            CartError::InvalidQuantity { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_quantity", message)
            }
            CartError::CartClosed { .. } => (StatusCode::CONFLICT, "cart_closed", message),
            CartError::CartInProgress { .. } => {
                (StatusCode::CONFLICT, "cart_in_progress", message)
            }
            CartError::OutOfStock { .. } => (StatusCode::CONFLICT, "out_of_stock", message),
            CartError::InsufficientStock { .. } => {
                (StatusCode::CONFLICT, "insufficient_stock", message)
            }
        },
        StoreError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_failed", message),
        StoreError::Decode { .. } | StoreError::Database(_) | StoreError::Migration(_) => {
            tracing::error!(error = %message, "storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

/// JSON body extractor whose rejections use the API error envelope.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}
