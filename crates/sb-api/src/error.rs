//! API client errors
//!
//! Backend failures always carry the server's own message when one was
//! returned, so the user sees what the server said rather than a generic
//! failure line.

use sb_core::error::SbError;
use thiserror::Error;

/// Errors from the backend client seam
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Not authorized: {0}")]
    Unauthorized(String),
    #[error("Server rejected the request: {message}")]
    Rejected { status: u16, message: String },
    #[error("Could not reach the server: {0}")]
    Transport(String),
    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// The server-provided message, when there is one to show.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => Some(message),
            ApiError::Unauthorized(message) => Some(message),
            _ => None,
        }
    }
}

impl From<ApiError> for SbError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound { entity, id } => SbError::NotFound {
                entity,
                field: "id",
                value: id,
            },
            ApiError::Unauthorized(message) => SbError::forbidden(message),
            ApiError::Rejected { status, message } => SbError::Backend {
                status: Some(status),
                message,
            },
            ApiError::Transport(message) | ApiError::Decode(message) => SbError::Backend {
                status: None,
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_keeps_server_message() {
        let err = ApiError::Rejected {
            status: 422,
            message: "Effective date overlaps an approved request".to_string(),
        };
        assert_eq!(
            err.server_message(),
            Some("Effective date overlaps an approved request")
        );

        match SbError::from(err) {
            SbError::Backend { status, message } => {
                assert_eq!(status, Some(422));
                assert!(message.contains("overlaps"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
