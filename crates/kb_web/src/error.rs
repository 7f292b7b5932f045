use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kb_core::Error;
use tracing::warn;

/// Error body of the JSON API: `{"error": "..."}` with a matching status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    /// Every scrape failure is the caller's problem: bad or unsupported URL.
    pub fn scrape_failed(err: Error) -> Self {
        Self::unprocessable(err.to_string())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::InvalidInput(_)
            | Error::InvalidUrl(_)
            | Error::UnsupportedSource(_)
            | Error::Scraping(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Inference(_) | Error::Http(_) | Error::External(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!("API request failed: {}", self.message);
        }
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}
