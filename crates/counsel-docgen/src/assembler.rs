//! Document assembly.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use counsel_core::models::document::{GeneratedDocument, GeneratedSection, SectionSource};
use counsel_core::models::template::{EffectiveTemplate, FormData, SectionBody};
use counsel_template::interpolate::interpolate_fields;
use uuid::Uuid;

use crate::generator::{SectionDraft, placeholder_text};

/// Combine static sections and drafted sections into the final document,
/// ordered by section order.
///
/// Static text and every section title are filled from `form`. An AI
/// section with no entry in `drafts` becomes a placeholder.
pub fn assemble(
    effective: &EffectiveTemplate,
    form: &FormData,
    drafts: &HashMap<String, SectionDraft>,
    session_prefix: String,
    generated_at: DateTime<Utc>,
) -> GeneratedDocument {
    let input_type = |key: &str| effective.input(key).map(|i| i.input_type);

    let mut sections: Vec<GeneratedSection> = effective
        .sections
        .iter()
        .map(|section| {
            let title = interpolate_fields(&section.title, form, input_type);
            let (text, source) = match &section.body {
                SectionBody::Static { content } => (
                    interpolate_fields(content, form, input_type),
                    SectionSource::Static,
                ),
                SectionBody::AiDrafted { .. } => match drafts.get(&section.id) {
                    Some(SectionDraft::Drafted(text)) => (text.clone(), SectionSource::AiDrafted),
                    Some(SectionDraft::Placeholder(text)) => {
                        (text.clone(), SectionSource::Placeholder)
                    }
                    None => (placeholder_text(&title), SectionSource::Placeholder),
                },
            };
            GeneratedSection {
                id: section.id.clone(),
                title,
                order: section.order,
                text,
                source,
            }
        })
        .collect();
    sections.sort_by_key(|s| s.order);

    GeneratedDocument {
        id: Uuid::new_v4(),
        template_id: effective.template_id.clone(),
        jurisdiction: effective.jurisdiction.clone(),
        sections,
        generated_at,
        session_prefix,
    }
}
