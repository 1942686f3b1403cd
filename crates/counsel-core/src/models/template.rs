//! Document template domain model.
//!
//! Templates are immutable configuration loaded at startup. A template
//! carries general content plus per-jurisdiction variants whose fields
//! are all optional overrides over the same shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SectionBody {
    /// Fixed text with `{{field}}` placeholders.
    Static { content: String },
    /// Narrative prose drafted by the language model from `prompt`.
    AiDrafted {
        prompt: String,
        #[serde(default)]
        max_tokens: Option<u32>,
    },
}

impl SectionBody {
    /// The text that placeholders are resolved in: content or prompt.
    pub fn text(&self) -> &str {
        match self {
            Self::Static { content } => content,
            Self::AiDrafted { prompt, .. } => prompt,
        }
    }

    pub fn text_mut(&mut self) -> &mut String {
        match self {
            Self::Static { content } => content,
            Self::AiDrafted { prompt, .. } => prompt,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateSection {
    pub id: String,
    pub title: String,
    /// Ordering key; sections are assembled in ascending order.
    pub order: u32,
    pub body: SectionBody,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Text,
    /// ISO calendar date, `YYYY-MM-DD`.
    Date,
    Enum,
    Boolean,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Enum => "enum",
            Self::Boolean => "boolean",
        }
    }
}

/// When an input must be supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    #[default]
    Optional,
    Always,
    /// Required only for the listed jurisdiction codes.
    InJurisdictions(Vec<String>),
    /// Required only when a jurisdiction variant was applied.
    WhenVariant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateInput {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub input_type: InputType,
    #[serde(default)]
    pub required: Requirement,
    /// Regex the textual form of the value must match in full.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Allowed values for [`InputType::Enum`].
    #[serde(default)]
    pub options: Vec<String>,
}

/// Partial override of a [`TemplateSection`]. A section id absent from
/// the base template adds a new section and must carry `order` and `body`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SectionOverride {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub body: Option<SectionBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JurisdictionVariant {
    pub jurisdiction: String,
    #[serde(default)]
    pub sections: Vec<SectionOverride>,
    #[serde(default)]
    pub inputs: Vec<TemplateInput>,
    /// Static text substitutions such as county lists or statutory citations.
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentTemplate {
    pub id: String,
    pub title: String,
    pub sections: Vec<TemplateSection>,
    #[serde(default)]
    pub inputs: Vec<TemplateInput>,
    /// General substitutions used when no variant overrides them.
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
    #[serde(default)]
    pub variants: BTreeMap<String, JurisdictionVariant>,
}

/// A base template merged with the variant for one jurisdiction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EffectiveTemplate {
    pub template_id: String,
    pub title: String,
    pub jurisdiction: String,
    pub variant_applied: bool,
    pub sections: Vec<TemplateSection>,
    pub inputs: Vec<TemplateInput>,
}

impl EffectiveTemplate {
    pub fn section(&self, id: &str) -> Option<&TemplateSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn input(&self, key: &str) -> Option<&TemplateInput> {
        self.inputs.iter().find(|i| i.key == key)
    }
}

/// Submitted field values, keyed by input key.
pub type FormData = BTreeMap<String, serde_json::Value>;
