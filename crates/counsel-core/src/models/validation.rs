//! Form validation outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    TypeMismatch { expected: String },
    PatternMismatch { pattern: String },
    NotAnOption { allowed: Vec<String> },
    InvalidDate,
}

/// One problem with one submitted field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldIssue {
    pub key: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl FieldIssue {
    pub fn new(key: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "{} is required", self.key),
            IssueKind::TypeMismatch { expected } => {
                write!(f, "{} must be a {expected}", self.key)
            }
            IssueKind::PatternMismatch { pattern } => {
                write!(f, "{} does not match {pattern}", self.key)
            }
            IssueKind::NotAnOption { allowed } => {
                write!(f, "{} must be one of: {}", self.key, allowed.join(", "))
            }
            IssueKind::InvalidDate => write!(f, "{} must be a date (YYYY-MM-DD)", self.key),
        }
    }
}
