//! Capability interface for the external text-generation service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One drafting call, scoped to a single section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftRequest {
    pub section_id: String,
    pub prompt: String,
    /// Upper bound on the length of the drafted text.
    pub max_tokens: u32,
    /// Kept low: sections are factual drafting, not creative writing.
    pub temperature: f32,
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("drafting request timed out")]
    Timeout,

    #[error("drafting service unavailable: {0}")]
    Unavailable(String),

    #[error("drafting request rejected: {0}")]
    Rejected(String),

    #[error("drafting service returned no text")]
    EmptyResponse,
}

impl DraftError {
    /// Whether a second attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Drafts prose for one section.
pub trait SectionDrafter: Send + Sync {
    fn draft(
        &self,
        request: DraftRequest,
    ) -> impl Future<Output = Result<String, DraftError>> + Send;
}

impl<D: SectionDrafter> SectionDrafter for std::sync::Arc<D> {
    fn draft(
        &self,
        request: DraftRequest,
    ) -> impl Future<Output = Result<String, DraftError>> + Send {
        (**self).draft(request)
    }
}
