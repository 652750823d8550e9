use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analysis::AnalysisError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub is_operational: bool,
}

impl AppError {
    pub fn bad_request(code: &str, message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: code.to_string(),
            message: message.to_string(),
            is_operational: true,
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND".to_string(),
            message: message.to_string(),
            is_operational: true,
        }
    }

    pub fn unprocessable(code: &str, message: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: code.to_string(),
            message: message.to_string(),
            is_operational: true,
        }
    }

    pub fn payload_too_large(message: &str) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            code: "PAYLOAD_TOO_LARGE".to_string(),
            message: message.to_string(),
            is_operational: true,
        }
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.to_string(),
            is_operational: false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let exposed_message = if self.is_operational {
            self.message.clone()
        } else {
            "Internal server error".to_string()
        };

        if self.is_operational {
            tracing::warn!(status = %self.status, code = %self.code, error = %self.message, "API error");
        } else {
            tracing::error!(status = %self.status, code = %self.code, error = %self.message, "Internal API error");
        }

        (
            self.status,
            Json(ErrorBody {
                success: false,
                code: self.code,
                message: exposed_message,
                trace_id: None,
            }),
        )
            .into_response()
    }
}

// Only run-level failures reach the API; frame-local ones are absorbed by the engine
// and never surface here in practice.
impl From<AnalysisError> for AppError {
    fn from(value: AnalysisError) -> Self {
        match &value {
            AnalysisError::EmptyVideo => {
                AppError::unprocessable("EMPTY_VIDEO", "No frames were received for analysis")
            }
            AnalysisError::InvalidConfig(msg) => AppError::bad_request("INVALID_CONFIG", msg),
            other => AppError::internal(&other.to_string()),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}
