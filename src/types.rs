//! Shared error type for the content service

use hyper::StatusCode;
use thiserror::Error;

/// Errors surfaced by stores, lookups and services
#[derive(Debug, Error)]
pub enum ContentServiceError {
    /// Record is missing or soft-deleted
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed input, unresolved remote reference or unknown status
    #[error("{0}")]
    Validation(String),

    /// Delete attempted while the content's status is not removable
    #[error("content is not removable")]
    NotRemovable,

    /// Remote lookup transport failure or unusable reply
    #[error("could not get a usable response from the {0}")]
    RemoteUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("NATS error: {0}")]
    Nats(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContentServiceError {
    /// HTTP status for the `{success: false}` envelope
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NotRemovable | Self::Json(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this failure was caused by the caller rather than the system
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

pub type Result<T> = std::result::Result<T, ContentServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ContentServiceError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ContentServiceError::NotRemovable.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ContentServiceError::NotFound("content".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ContentServiceError::RemoteUnavailable("subject service".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ContentServiceError::Database("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ContentServiceError::NotFound("content".into()).to_string(),
            "content not found"
        );
        assert_eq!(
            ContentServiceError::NotRemovable.to_string(),
            "content is not removable"
        );
        assert!(!ContentServiceError::Database("x".into()).is_client_error());
    }
}
