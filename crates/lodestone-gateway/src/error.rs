use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lodestone_core::InventoryError;
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Json(#[from] JsonRejection),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Json(rejection) => rejection.status(),
            AppError::Inventory(err) => match err {
                InventoryError::InvalidSku(_) | InventoryError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
                InventoryError::SkuConflict(_) => StatusCode::CONFLICT,
                InventoryError::StorageFull(_) => StatusCode::INSUFFICIENT_STORAGE,
                InventoryError::Generator(_) | InventoryError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
