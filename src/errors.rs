use crate::journal::InvalidUpdate;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

/// Message shown when an uploaded backup cannot be read.
pub const INVALID_IMPORT: &str = "Invalid data format.";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn invalid_import() -> Self {
        Self::bad_request(INVALID_IMPORT)
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<InvalidUpdate> for AppError {
    fn from(err: InvalidUpdate) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, "request failed: {}", self.message);
        }
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_updates_are_client_errors() {
        let err = AppError::from(InvalidUpdate::UnknownMeal("brunch".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "unknown meal id 'brunch'");
    }

    #[test]
    fn io_failures_are_server_errors() {
        let err = AppError::from(std::io::Error::other("disk full"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::invalid_import().message, INVALID_IMPORT);
    }
}
