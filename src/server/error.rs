//! Mapping of lifecycle failures onto HTTP responses.

use super::MessageBody;
use crate::kanban::{
    domain::KanbanDomainError,
    ports::BoardStoreError,
    services::{SyncError, TransactionError},
};
use crate::lifecycle::{ports::AnnotationError, services::LifecycleError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failed request, rendered as `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        let status = lifecycle_status(&err);
        if status.is_server_error() {
            tracing::error!(error = %err, %status, "request failed");
        } else {
            tracing::warn!(error = %err, %status, "request rejected");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageBody::new(self.message))).into_response()
    }
}

const fn lifecycle_status(err: &LifecycleError) -> StatusCode {
    match err {
        LifecycleError::Transaction(inner) | LifecycleError::Sync(SyncError::Transaction(inner)) => {
            transaction_status(inner)
        }
        LifecycleError::Tip(_) | LifecycleError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        LifecycleError::Annotation(
            AnnotationError::UnknownRepository(_) | AnnotationError::TitleNotFound { .. },
        ) => StatusCode::NOT_FOUND,
        LifecycleError::Annotation(_)
        | LifecycleError::Template(_)
        | LifecycleError::Sync(SyncError::Checkpoint(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

const fn transaction_status(err: &TransactionError) -> StatusCode {
    match err {
        TransactionError::Domain(KanbanDomainError::NotFound { .. }) => StatusCode::NOT_FOUND,
        TransactionError::Domain(KanbanDomainError::AlreadyPresent { .. })
        | TransactionError::Store(BoardStoreError::Conflict { .. }) => StatusCode::CONFLICT,
        TransactionError::Domain(KanbanDomainError::EmptyItem) => StatusCode::BAD_REQUEST,
        TransactionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
