use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cdshelf_core::ServiceError;
use thiserror::Error;
use tracing::warn;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("item id is required")]
    MissingItemId,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingItemId => StatusCode::BAD_REQUEST,
            AppError::Service(ServiceError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            AppError::Service(ServiceError::Upstream(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
