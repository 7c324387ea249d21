use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::dao::{query_engine::QueryError, storage::StorageError};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Persisted data could not be interpreted.
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Storage(StorageError::Corrupt { message, .. }) => {
                ServiceError::Corrupt(message)
            }
            QueryError::Storage(source) => ServiceError::Unavailable(source),
            QueryError::NotFound { kind, id } => {
                ServiceError::NotFound(format!("{kind} `{id}` not found"))
            }
            QueryError::GameFinished(id) => {
                ServiceError::InvalidState(format!("game `{id}` is already finished"))
            }
            other @ (QueryError::Decode { .. }
            | QueryError::Encode { .. }
            | QueryError::CounterExhausted
            | QueryError::NotInitialized) => ServiceError::Corrupt(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Storage backend unreachable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Corrupt(message) => AppError::Internal(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_errors_map_to_http_statuses() {
        let cases = [
            (
                QueryError::NotFound { kind: "team", id: 3 },
                StatusCode::NOT_FOUND,
            ),
            (QueryError::GameFinished(4), StatusCode::CONFLICT),
            (QueryError::CounterExhausted, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let app: AppError = ServiceError::from(err).into();
            assert_eq!(app.into_response().status(), expected);
        }
    }

    #[test]
    fn unavailable_storage_is_503() {
        let io = std::io::Error::other("disk gone");
        let err = QueryError::Storage(StorageError::unavailable("writing".into(), io));
        let app: AppError = ServiceError::from(err).into();
        assert_eq!(app.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
