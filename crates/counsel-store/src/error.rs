//! Store-specific error types and conversions.

use counsel_core::error::CounselError;

/// Store-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} lock poisoned")]
    Poisoned(&'static str),

    #[error("Record already exists: {entity}")]
    Duplicate { entity: String },
}

impl From<StoreError> for CounselError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { entity } => CounselError::AlreadyExists { entity },
            other => CounselError::Internal(other.to_string()),
        }
    }
}
