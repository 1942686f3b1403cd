//! `{{name}}` placeholder handling.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use counsel_core::models::template::{FormData, InputType};
use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("placeholder regex")
});

/// Placeholder names in `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Replace every placeholder `lookup` resolves; leave the rest untouched.
pub fn fill<'a, F>(text: &'a str, mut lookup: F) -> Cow<'a, str>
where
    F: FnMut(&str) -> Option<String>,
{
    PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
}

/// Apply static-text substitutions (county lists, statutory citations).
pub fn substitute(text: &str, substitutions: &BTreeMap<String, String>) -> String {
    if substitutions.is_empty() {
        return text.to_string();
    }
    fill(text, |name| substitutions.get(name).cloned()).into_owned()
}

/// Textual form of a submitted value.
pub fn render_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.trim().to_string()),
        serde_json::Value::Bool(true) => Some("Yes".into()),
        serde_json::Value::Bool(false) => Some("No".into()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(render_value)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        serde_json::Value::Object(_) => Some(value.to_string()),
    }
}

/// Textual form of a value submitted for an input of `input_type`.
/// Boolean inputs render as Yes/No whether sent as JSON or as text.
pub fn render_input(value: &serde_json::Value, input_type: InputType) -> Option<String> {
    match (input_type, value) {
        (InputType::Boolean, serde_json::Value::String(s)) => match s.trim() {
            "true" => Some("Yes".into()),
            "false" => Some("No".into()),
            _ => render_value(value),
        },
        _ => render_value(value),
    }
}

/// Fill field placeholders from form data. `input_type` names the type of
/// each declared field; declared fields with no value render as empty
/// text, undeclared names are kept unless the form supplies them.
pub fn interpolate_fields<F>(text: &str, form: &FormData, input_type: F) -> String
where
    F: Fn(&str) -> Option<InputType>,
{
    fill(text, |name| {
        let value = form.get(name);
        match input_type(name) {
            Some(ty) => Some(value.and_then(|v| render_input(v, ty)).unwrap_or_default()),
            None => value.and_then(render_value),
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_placeholders_with_whitespace() {
        assert_eq!(
            placeholders("In re {{ case_number }} before {{court_name}}."),
            vec!["case_number", "court_name"]
        );
    }

    #[test]
    fn substitution_leaves_unknown_names() {
        let subs = BTreeMap::from([(
            "court_name".to_string(),
            "the Superior Court of {{county}}".to_string(),
        )]);
        assert_eq!(
            substitute("Filed in {{court_name}} on {{filed_on}}", &subs),
            "Filed in the Superior Court of {{county}} on {{filed_on}}"
        );
    }

    #[test]
    fn fields_render_by_type() {
        let form = FormData::from([
            ("county".to_string(), json!("Alameda")),
            ("minor".to_string(), json!(true)),
        ]);
        let out = interpolate_fields(
            "{{county}} / {{minor}} / {{notes}} / {{other}}",
            &form,
            |k| (k != "other").then_some(InputType::Text),
        );
        assert_eq!(out, "Alameda / Yes /  / {{other}}");
    }

    #[test]
    fn boolean_text_renders_like_boolean_json() {
        let form = FormData::from([
            ("minor".to_string(), json!("true")),
            ("sealed".to_string(), json!(" false ")),
            ("county".to_string(), json!("true")),
        ]);
        let types = |k: &str| match k {
            "minor" | "sealed" => Some(InputType::Boolean),
            "county" => Some(InputType::Text),
            _ => None,
        };
        assert_eq!(
            interpolate_fields("{{minor}} {{sealed}} {{county}}", &form, types),
            "Yes No true"
        );
        assert_eq!(render_input(&json!(true), InputType::Boolean).as_deref(), Some("Yes"));
    }
}
