//! Generated document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SectionSource {
    Static,
    AiDrafted,
    /// Drafting failed; the attorney must write this section by hand.
    Placeholder,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedSection {
    pub id: String,
    pub title: String,
    pub order: u32,
    pub text: String,
    pub source: SectionSource,
}

/// The terminal artifact of one generation request. Never mutated once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub id: Uuid,
    pub template_id: String,
    pub jurisdiction: String,
    pub sections: Vec<GeneratedSection>,
    pub generated_at: DateTime<Utc>,
    pub session_prefix: String,
}

impl GeneratedDocument {
    /// Section texts in order, separated by blank lines.
    pub fn full_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Ids of sections that fell back to a placeholder.
    pub fn needs_review(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.source == SectionSource::Placeholder)
            .map(|s| s.id.as_str())
            .collect()
    }

    pub fn section(&self, id: &str) -> Option<&GeneratedSection> {
        self.sections.iter().find(|s| s.id == id)
    }
}
