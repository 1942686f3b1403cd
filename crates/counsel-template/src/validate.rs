//! Form validation against an effective template.

use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use chrono::NaiveDate;
use counsel_core::error::{CounselError, CounselResult};
use counsel_core::models::template::{
    EffectiveTemplate, FormData, InputType, Requirement, TemplateInput,
};
use counsel_core::models::validation::{FieldIssue, IssueKind};
use regex::Regex;
use tracing::error;

use crate::interpolate::render_value;

/// Date format accepted for [`InputType::Date`] inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static PATTERNS: LazyLock<RwLock<HashMap<String, Regex>>> = LazyLock::new(Default::default);

/// Anchored matcher for an input pattern, compiled once per distinct
/// pattern. Catalog loading compiles every declared pattern up front.
pub fn compiled_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let cached = PATTERNS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
        .cloned();
    if let Some(re) = cached {
        return Ok(re);
    }
    let re = Regex::new(&format!("^(?:{pattern})$"))?;
    PATTERNS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(pattern.to_string(), re.clone());
    Ok(re)
}

#[cfg(test)]
pub(crate) fn is_pattern_compiled(pattern: &str) -> bool {
    PATTERNS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(pattern)
}

/// Validate `form` against every input of `effective`.
///
/// All problems are collected; the error carries the full list.
pub fn validate(effective: &EffectiveTemplate, form: &FormData) -> CounselResult<()> {
    let issues = collect_issues(effective, form);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(CounselError::ValidationFailed { issues })
    }
}

pub fn collect_issues(effective: &EffectiveTemplate, form: &FormData) -> Vec<FieldIssue> {
    effective
        .inputs
        .iter()
        .filter_map(|input| check_input(effective, input, form.get(&input.key)))
        .collect()
}

/// Whether `input` must be supplied for this effective template.
pub fn is_required(effective: &EffectiveTemplate, input: &TemplateInput) -> bool {
    match &input.required {
        Requirement::Optional => false,
        Requirement::Always => true,
        Requirement::InJurisdictions(codes) => codes
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&effective.jurisdiction)),
        Requirement::WhenVariant => effective.variant_applied,
    }
}

fn is_blank(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => true,
        Some(serde_json::Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn check_input(
    effective: &EffectiveTemplate,
    input: &TemplateInput,
    value: Option<&serde_json::Value>,
) -> Option<FieldIssue> {
    if is_blank(value) {
        return is_required(effective, input)
            .then(|| FieldIssue::new(&input.key, IssueKind::Missing));
    }
    let value = value?;

    if let Err(kind) = check_type(input, value) {
        return Some(FieldIssue::new(&input.key, kind));
    }

    let pattern = input.pattern.as_deref()?;
    let text = render_value(value).unwrap_or_default();
    match compiled_pattern(pattern) {
        Ok(re) if re.is_match(&text) => None,
        Ok(_) => Some(FieldIssue::new(
            &input.key,
            IssueKind::PatternMismatch {
                pattern: pattern.to_string(),
            },
        )),
        Err(e) => {
            // Catalog loading rejects bad patterns, so this is a bug upstream.
            error!(input = %input.key, error = %e, "Skipping uncompilable input pattern");
            None
        }
    }
}

fn check_type(input: &TemplateInput, value: &serde_json::Value) -> Result<(), IssueKind> {
    use serde_json::Value;

    let mismatch = || IssueKind::TypeMismatch {
        expected: input.input_type.as_str().to_string(),
    };

    match (input.input_type, value) {
        (InputType::Text, Value::String(_) | Value::Number(_)) => Ok(()),
        (InputType::Date, Value::String(s)) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(|_| ())
            .map_err(|_| IssueKind::InvalidDate),
        (InputType::Enum, Value::String(s)) => {
            if input.options.iter().any(|o| o == s.trim()) {
                Ok(())
            } else {
                Err(IssueKind::NotAnOption {
                    allowed: input.options.clone(),
                })
            }
        }
        (InputType::Boolean, Value::Bool(_)) => Ok(()),
        (InputType::Boolean, Value::String(s))
            if matches!(s.trim(), "true" | "false") =>
        {
            Ok(())
        }
        _ => Err(mismatch()),
    }
}
