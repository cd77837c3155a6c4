//! Handler error types

use thiserror::Error;
use weview_service::ServiceError;

use crate::protocol::{CloseCode, ErrorFrame};

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame could not be decoded
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Relay operation failed
    #[error("{0}")]
    Service(#[from] ServiceError),
}

impl HandlerError {
    /// Close code for errors that end the connection, `None` keeps it open
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::InvalidPayload(_) => Some(CloseCode::DecodeError),
            Self::Service(_) => None,
        }
    }

    /// Error frame reported to the client
    pub fn to_frame(&self) -> ErrorFrame {
        match self {
            Self::InvalidPayload(msg) => ErrorFrame::new("INVALID_PAYLOAD", msg.clone()),
            Self::Service(e) => ErrorFrame::new(e.error_code(), e.to_string()),
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use weview_core::DomainError;

    #[test]
    fn test_invalid_payload_closes() {
        let err = HandlerError::InvalidPayload("bad json".to_string());
        assert_eq!(err.to_close_code(), Some(CloseCode::DecodeError));
        assert_eq!(err.to_frame().error.code, "INVALID_PAYLOAD");
    }

    #[test]
    fn test_client_errors_keep_connection() {
        let err = HandlerError::from(ServiceError::from(DomainError::InvalidUsername(
            "empty".to_string(),
        )));
        assert_eq!(err.to_close_code(), None);
        assert_eq!(err.to_frame().error.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_server_errors_keep_connection() {
        let err = HandlerError::from(ServiceError::from(DomainError::CacheError(
            "down".to_string(),
        )));
        assert_eq!(err.to_close_code(), None);
        assert_eq!(err.to_frame().error.code, "CACHE_ERROR");
    }
}
