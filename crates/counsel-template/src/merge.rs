//! Jurisdiction variant merging.
//!
//! [`merge`] is a pure function of the base template and an optional
//! variant. Overrides replace individual fields of matching sections,
//! ordering key included. Unknown section ids add sections, variant inputs
//! replace same-key base inputs, and substitutions are applied textually
//! to every section.

use std::collections::BTreeMap;

use counsel_core::models::template::{
    DocumentTemplate, EffectiveTemplate, JurisdictionVariant, TemplateInput, TemplateSection,
};
use tracing::{debug, warn};

use crate::interpolate::substitute;

/// Merge `variant` (if any) over `base` for `jurisdiction`.
pub fn merge(
    base: &DocumentTemplate,
    variant: Option<&JurisdictionVariant>,
    jurisdiction: &str,
) -> EffectiveTemplate {
    let mut sections = base.sections.clone();
    let mut inputs = base.inputs.clone();
    let mut substitutions = base.substitutions.clone();

    if let Some(variant) = variant {
        apply_section_overrides(&mut sections, variant, &base.id);
        merge_inputs(&mut inputs, &variant.inputs);
        substitutions.extend(
            variant
                .substitutions
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }

    // Stable: equal keys keep their listing order, base before added.
    sections.sort_by_key(|s| s.order);
    apply_substitutions(&mut sections, &substitutions);

    debug!(
        template = %base.id,
        jurisdiction,
        variant_applied = variant.is_some(),
        sections = sections.len(),
        inputs = inputs.len(),
        "Resolved effective template"
    );

    EffectiveTemplate {
        template_id: base.id.clone(),
        title: base.title.clone(),
        jurisdiction: jurisdiction.to_string(),
        variant_applied: variant.is_some(),
        sections,
        inputs,
    }
}

fn apply_section_overrides(
    sections: &mut Vec<TemplateSection>,
    variant: &JurisdictionVariant,
    template_id: &str,
) {
    for over in &variant.sections {
        if let Some(section) = sections.iter_mut().find(|s| s.id == over.id) {
            if let Some(title) = &over.title {
                section.title = title.clone();
            }
            if let Some(order) = over.order {
                section.order = order;
            }
            if let Some(body) = &over.body {
                section.body = body.clone();
            }
            continue;
        }

        match (over.order, &over.body) {
            (Some(order), Some(body)) => sections.push(TemplateSection {
                id: over.id.clone(),
                title: over.title.clone().unwrap_or_else(|| over.id.clone()),
                order,
                body: body.clone(),
            }),
            _ => warn!(
                template = template_id,
                jurisdiction = %variant.jurisdiction,
                section = %over.id,
                "Variant adds a section without order or body, skipping"
            ),
        }
    }
}

fn merge_inputs(inputs: &mut Vec<TemplateInput>, overrides: &[TemplateInput]) {
    for input in overrides {
        match inputs.iter_mut().find(|i| i.key == input.key) {
            Some(existing) => *existing = input.clone(),
            None => inputs.push(input.clone()),
        }
    }
}

fn apply_substitutions(sections: &mut [TemplateSection], substitutions: &BTreeMap<String, String>) {
    if substitutions.is_empty() {
        return;
    }
    for section in sections {
        section.title = substitute(&section.title, substitutions);
        let text = section.body.text_mut();
        *text = substitute(text, substitutions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_core::models::template::{InputType, Requirement, SectionBody, SectionOverride};

    fn static_section(id: &str, order: u32, content: &str) -> TemplateSection {
        TemplateSection {
            id: id.into(),
            title: id.into(),
            order,
            body: SectionBody::Static {
                content: content.into(),
            },
        }
    }

    fn text_input(key: &str, required: Requirement) -> TemplateInput {
        TemplateInput {
            key: key.into(),
            label: key.into(),
            input_type: InputType::Text,
            required,
            pattern: None,
            options: Vec::new(),
        }
    }

    fn base() -> DocumentTemplate {
        DocumentTemplate {
            id: "declaration".into(),
            title: "Declaration".into(),
            sections: vec![
                static_section("caption", 10, "IN THE COURT"),
                static_section("body", 20, "Case {{case_number}}"),
                static_section("signature", 30, "Signed"),
            ],
            inputs: vec![text_input("case_number", Requirement::Always)],
            substitutions: BTreeMap::from([("court_name".into(), "the Court".into())]),
            variants: BTreeMap::new(),
        }
    }

    fn ca_variant() -> JurisdictionVariant {
        JurisdictionVariant {
            jurisdiction: "CA".into(),
            sections: vec![SectionOverride {
                id: "caption".into(),
                body: Some(SectionBody::Static {
                    content: "SUPERIOR COURT OF CALIFORNIA, COUNTY OF {{county}}".into(),
                }),
                ..Default::default()
            }],
            inputs: vec![text_input("county", Requirement::WhenVariant)],
            substitutions: BTreeMap::new(),
        }
    }

    #[test]
    fn variant_overrides_caption_and_adds_county_once() {
        let base = base();
        let variant = ca_variant();
        let effective = merge(&base, Some(&variant), "CA");

        let ids: Vec<_> = effective.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["caption", "body", "signature"]);
        assert_eq!(
            effective.section("caption").unwrap().body,
            variant.sections[0].body.clone().unwrap()
        );
        assert_eq!(
            effective.inputs.iter().filter(|i| i.key == "county").count(),
            1
        );
        assert!(effective.variant_applied);
    }

    #[test]
    fn no_variant_keeps_base() {
        let base = base();
        let effective = merge(&base, None, "NV");
        assert!(!effective.variant_applied);
        assert_eq!(effective.sections, base.sections);
        assert_eq!(effective.inputs, base.inputs);
    }

    #[test]
    fn added_section_is_placed_by_order_key() {
        let base = base();
        let mut variant = ca_variant();
        variant.sections.push(SectionOverride {
            id: "notice".into(),
            title: Some("Notice".into()),
            order: Some(25),
            body: Some(SectionBody::Static {
                content: "Notice text".into(),
            }),
        });
        let effective = merge(&base, Some(&variant), "CA");
        let ids: Vec<_> = effective.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["caption", "body", "notice", "signature"]);
    }

    #[test]
    fn override_can_move_an_existing_section() {
        let base = base();
        let mut variant = ca_variant();
        variant.sections.push(SectionOverride {
            id: "signature".into(),
            order: Some(5),
            ..Default::default()
        });
        let effective = merge(&base, Some(&variant), "CA");

        let ids: Vec<_> = effective.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["signature", "caption", "body"]);
        let signature = effective.section("signature").unwrap();
        assert_eq!(signature.order, 5);
        assert_eq!(signature.body.text(), "Signed");
    }

    #[test]
    fn added_section_without_body_is_skipped() {
        let base = base();
        let mut variant = ca_variant();
        variant.sections.push(SectionOverride {
            id: "ghost".into(),
            order: Some(5),
            ..Default::default()
        });
        let effective = merge(&base, Some(&variant), "CA");
        assert!(effective.section("ghost").is_none());
    }

    #[test]
    fn variant_input_replaces_base_input_in_place() {
        let base = base();
        let mut variant = ca_variant();
        let mut stricter = text_input("case_number", Requirement::Always);
        stricter.pattern = Some(r"[A-Z]{2}-\d{4}-\d{3}".into());
        variant.inputs.push(stricter.clone());

        let effective = merge(&base, Some(&variant), "CA");
        assert_eq!(effective.inputs[0], stricter);
        assert_eq!(effective.inputs.len(), 2);
    }

    #[test]
    fn substitutions_prefer_variant_values() {
        let mut base = base();
        base.sections[0] = static_section("caption", 10, "Filed in {{court_name}}");
        let mut variant = ca_variant();
        variant.sections.clear();
        variant.substitutions.insert(
            "court_name".into(),
            "the Superior Court of {{county}}".into(),
        );

        let effective = merge(&base, Some(&variant), "CA");
        assert_eq!(
            effective.section("caption").unwrap().body.text(),
            "Filed in the Superior Court of {{county}}"
        );

        let general = merge(&base, None, "OR");
        assert_eq!(
            general.section("caption").unwrap().body.text(),
            "Filed in the Court"
        );
    }

    #[test]
    fn merge_is_deterministic() {
        let base = base();
        let variant = ca_variant();
        assert_eq!(
            merge(&base, Some(&variant), "CA"),
            merge(&base, Some(&variant), "CA")
        );
    }
}
