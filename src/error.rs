use axum::http::StatusCode;
use tracing::error;

use crate::remote::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ServiceError::Store(StoreError::Decode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Store(
                StoreError::UnknownColumn { .. } | StoreError::InvalidRecord(_),
            ) => StatusCode::BAD_REQUEST,
            ServiceError::Store(StoreError::Database(_) | StoreError::Unavailable(_)) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

/// Handler-side conversion into the `(StatusCode, String)` rejection.
pub(crate) fn reject(e: ServiceError) -> (StatusCode, String) {
    let status = e.status();
    if status.is_server_error() {
        error!(error = %e, %status, "request failed");
    }
    (status, e.to_string())
}
