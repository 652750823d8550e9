use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::response::AppError;

/// A wrapper around `axum::Json<T>` that returns `AppError` on deserialization failure
/// instead of Axum's default plain-text rejection.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection_to_app_error(rejection)),
        }
    }
}

fn json_rejection_to_app_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            tracing::warn!(error = %e, "JSON data deserialization failed");
            AppError::bad_request("INVALID_REQUEST_BODY", &e.body_text())
        }
        JsonRejection::JsonSyntaxError(e) => {
            tracing::warn!(error = %e, "JSON syntax parsing failed");
            AppError::bad_request("INVALID_REQUEST_BODY", "Request body is not valid JSON")
        }
        JsonRejection::MissingJsonContentType(e) => {
            tracing::warn!(error = %e, "Missing or invalid JSON Content-Type");
            AppError::bad_request("INVALID_REQUEST_BODY", "Expected application/json")
        }
        JsonRejection::BytesRejection(e) => {
            tracing::warn!(error = %e, "Failed to read request body bytes");
            if e.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
                AppError::payload_too_large("Request body exceeds the configured limit")
            } else {
                AppError::bad_request("INVALID_REQUEST_BODY", "Request body could not be read")
            }
        }
        other => {
            tracing::warn!(error = %other, "Unexpected JSON body rejection");
            AppError::bad_request("INVALID_REQUEST_BODY", "Invalid request body")
        }
    }
}
