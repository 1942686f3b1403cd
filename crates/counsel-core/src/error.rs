//! Error types for the Counsel engine.

use std::fmt;

use thiserror::Error;

use crate::models::validation::FieldIssue;

/// Why a presented session identifier was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFailure {
    NotFound,
    Expired,
    Terminated,
}

impl fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "session not found",
            Self::Expired => "session expired",
            Self::Terminated => "session terminated",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum CounselError {
    #[error("Attestation incomplete: missing {}", .missing.join(", "))]
    AttestationIncomplete { missing: Vec<String> },

    #[error("Session invalid: {0}")]
    SessionInvalid(SessionFailure),

    #[error("Template not found: {template_id}")]
    TemplateNotFound { template_id: String },

    #[error("Validation failed: {}", format_issues(.issues))]
    ValidationFailed { issues: Vec<FieldIssue> },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audit log error: {0}")]
    Audit(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CounselError {
    /// The caller must re-attest before retrying.
    pub fn requires_reattestation(&self) -> bool {
        matches!(self, Self::SessionInvalid(_))
    }

    /// Errors caused by the caller's own input, safe to echo back verbatim.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::AttestationIncomplete { .. }
                | Self::SessionInvalid(_)
                | Self::TemplateNotFound { .. }
                | Self::ValidationFailed { .. }
        )
    }
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type CounselResult<T> = Result<T, CounselError>;
