/// Structured error types for dsasocio-core.
///
/// The binary (dsasocio-cli) wraps these in `anyhow`; the server maps them
/// onto HTTP status codes.
use thiserror::Error;

use crate::models::{RequestStatus, ValidationError};

/// Main error type for dsasocio-core operations
#[derive(Error, Debug)]
pub enum SocioError {
    /// User input failed validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Friend request moved between states it cannot move between
    #[error("friend request cannot move from {from} to {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    /// Caller is not allowed to perform the action
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },
}

/// Result type alias for dsasocio-core operations
pub type Result<T> = std::result::Result<T, SocioError>;

impl SocioError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SocioError::InvalidTransition {
            from: RequestStatus::Accepted,
            to: RequestStatus::Rejected,
        };
        assert_eq!(
            err.to_string(),
            "friend request cannot move from accepted to rejected"
        );

        let err: SocioError = ValidationError::Empty { field: "message" }.into();
        assert_eq!(err.to_string(), "message cannot be empty");
    }
}
