use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use floornav_core::Error;
use serde_json::json;

/// Error returned by route handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    Engine(Error),
    BadRequest(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Engine(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(err) => match err {
                Error::UnknownElement { .. } => StatusCode::NOT_FOUND,
                Error::InvalidData(_) | Error::JsonError(_) => StatusCode::BAD_REQUEST,
                Error::IoError(_) | Error::GeoJsonError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Engine(err) => err.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
        };
        if status.is_server_error() {
            tracing::error!(%status, "{message}");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
