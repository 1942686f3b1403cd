//! Template catalog loading and definition checks.
//!
//! Templates are TOML files in one directory, one template per file.
//! Every template is checked before the registry is built so that
//! configuration mistakes stop startup instead of surfacing mid-request.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use counsel_core::models::template::{DocumentTemplate, InputType, SectionBody, TemplateInput};
use tracing::info;

use crate::error::CatalogError;
use crate::registry::StaticTemplateRegistry;
use crate::validate::compiled_pattern;

/// Where to load templates from.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Directory containing `*.toml` template definitions.
    pub template_dir: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("templates"),
        }
    }
}

/// Load, check and index every template in the configured directory.
pub fn load_catalog(config: &CatalogConfig) -> Result<StaticTemplateRegistry, CatalogError> {
    let dir = &config.template_dir;
    info!(dir = %dir.display(), "Loading template catalog");

    let io_err = |source| CatalogError::Io {
        path: dir.clone(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut templates = Vec::with_capacity(paths.len());
    for path in &paths {
        templates.push(parse_template_file(path)?);
    }

    let registry = StaticTemplateRegistry::from_templates(templates)?;
    info!(templates = registry.len(), "Template catalog loaded");
    Ok(registry)
}

/// Parse one TOML template definition.
pub fn parse_template_file(path: &Path) -> Result<DocumentTemplate, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Check a template definition, reporting every problem found.
pub fn check_template(template: &DocumentTemplate) -> Result<(), CatalogError> {
    let mut problems = Vec::new();

    if template.sections.is_empty() {
        problems.push("template has no sections".to_string());
    }

    let mut section_ids = HashSet::new();
    for section in &template.sections {
        if !section_ids.insert(section.id.as_str()) {
            problems.push(format!("duplicate section id `{}`", section.id));
        }
        check_body(&section.id, &section.body, &mut problems);
    }

    check_inputs("", &template.inputs, &mut problems);

    for (code, variant) in &template.variants {
        let ctx = format!("variant {code}: ");
        if *code != code.to_ascii_uppercase() {
            problems.push(format!("{ctx}jurisdiction codes must be upper case"));
        }
        if variant.jurisdiction != *code {
            problems.push(format!(
                "{ctx}declares jurisdiction `{}`",
                variant.jurisdiction
            ));
        }
        for over in &variant.sections {
            if let Some(body) = &over.body {
                check_body(&over.id, body, &mut problems);
            }
            let adds = !section_ids.contains(over.id.as_str());
            if adds && (over.order.is_none() || over.body.is_none()) {
                problems.push(format!(
                    "{ctx}new section `{}` needs both order and body",
                    over.id
                ));
            }
        }
        check_inputs(&ctx, &variant.inputs, &mut problems);
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Invalid {
            template_id: template.id.clone(),
            problems,
        })
    }
}

fn check_body(section_id: &str, body: &SectionBody, problems: &mut Vec<String>) {
    if let SectionBody::AiDrafted { prompt, .. } = body {
        if prompt.trim().is_empty() {
            problems.push(format!("section `{section_id}` has an empty prompt"));
        }
    }
}

fn check_inputs(ctx: &str, inputs: &[TemplateInput], problems: &mut Vec<String>) {
    let mut keys = HashSet::new();
    for input in inputs {
        if !keys.insert(input.key.as_str()) {
            problems.push(format!("{ctx}duplicate input key `{}`", input.key));
        }
        if input.input_type == InputType::Enum && input.options.is_empty() {
            problems.push(format!("{ctx}enum input `{}` has no options", input.key));
        }
        if let Some(pattern) = &input.pattern {
            if let Err(e) = compiled_pattern(pattern) {
                problems.push(format!(
                    "{ctx}input `{}` has an invalid pattern: {e}",
                    input.key
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_core::models::template::{
        JurisdictionVariant, Requirement, SectionOverride, TemplateSection,
    };
    use std::collections::BTreeMap;

    fn template() -> DocumentTemplate {
        DocumentTemplate {
            id: "t".into(),
            title: "T".into(),
            sections: vec![TemplateSection {
                id: "caption".into(),
                title: "Caption".into(),
                order: 1,
                body: SectionBody::Static {
                    content: "x".into(),
                },
            }],
            inputs: Vec::new(),
            substitutions: BTreeMap::new(),
            variants: BTreeMap::new(),
        }
    }

    fn problems(template: &DocumentTemplate) -> Vec<String> {
        match check_template(template) {
            Ok(()) => Vec::new(),
            Err(CatalogError::Invalid { problems, .. }) => problems,
            Err(other) => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn valid_template_passes() {
        assert!(check_template(&template()).is_ok());
    }

    #[test]
    fn duplicate_section_ids_are_rejected() {
        let mut t = template();
        t.sections.push(t.sections[0].clone());
        assert_eq!(problems(&t), vec!["duplicate section id `caption`"]);
    }

    #[test]
    fn collects_all_problems() {
        let mut t = template();
        t.inputs = vec![
            TemplateInput {
                key: "role".into(),
                label: "Role".into(),
                input_type: InputType::Enum,
                required: Requirement::Always,
                pattern: Some("(".into()),
                options: Vec::new(),
            },
        ];
        t.variants.insert(
            "CA".into(),
            JurisdictionVariant {
                jurisdiction: "NV".into(),
                sections: vec![SectionOverride {
                    id: "venue".into(),
                    ..Default::default()
                }],
                ..Default::default()
            },
        );
        assert_eq!(problems(&t).len(), 4);
    }

    #[test]
    fn lower_case_variant_keys_are_rejected() {
        let mut t = template();
        t.variants.insert(
            "ca".into(),
            JurisdictionVariant {
                jurisdiction: "ca".into(),
                ..Default::default()
            },
        );
        assert_eq!(
            problems(&t),
            vec!["variant ca: jurisdiction codes must be upper case"]
        );
    }

    #[test]
    fn declared_patterns_are_compiled_during_checks() {
        let mut t = template();
        t.inputs = vec![TemplateInput {
            key: "bar_number".into(),
            label: "Bar number".into(),
            input_type: InputType::Text,
            required: Requirement::Always,
            pattern: Some("[0-9]{6,8}".into()),
            options: Vec::new(),
        }];
        assert!(check_template(&t).is_ok());
        assert!(crate::validate::is_pattern_compiled("[0-9]{6,8}"));
    }
}
