//! Attestation and session error types.

use counsel_core::error::{CounselError, SessionFailure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("attestation incomplete: missing {}", .0.join(", "))]
    AttestationIncomplete(Vec<String>),

    #[error("session not found")]
    SessionNotFound,

    #[error("session has expired")]
    SessionExpired,

    #[error("session was terminated")]
    SessionTerminated,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<AuthError> for CounselError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AttestationIncomplete(missing) => {
                CounselError::AttestationIncomplete { missing }
            }
            AuthError::SessionNotFound => CounselError::SessionInvalid(SessionFailure::NotFound),
            AuthError::SessionExpired => CounselError::SessionInvalid(SessionFailure::Expired),
            AuthError::SessionTerminated => {
                CounselError::SessionInvalid(SessionFailure::Terminated)
            }
            AuthError::Config(msg) => CounselError::Config(msg),
        }
    }
}
