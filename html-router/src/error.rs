use async_openai::error::OpenAIError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::error::AppError;
use serde_json::json;
use tracing::error;

/// Wraps [`AppError`] so handlers can `?` straight into an HTTP response.
pub struct HtmlError(pub AppError);

impl From<AppError> for HtmlError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl From<OpenAIError> for HtmlError {
    fn from(error: OpenAIError) -> Self {
        Self(AppError::OpenAI(error))
    }
}

impl From<minijinja::Error> for HtmlError {
    fn from(error: minijinja::Error) -> Self {
        Self(AppError::Template(error))
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::DuplicateId(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
