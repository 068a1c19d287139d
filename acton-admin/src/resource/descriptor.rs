//! JSON component descriptors consumed by the frontend renderer

use serde_json::{json, Map, Value};

use crate::fields::Field;
use crate::validation::Mode;

/// Describe one field, its options and its conditional branches
///
/// `required` reflects the required rules that apply in `mode`, so the same
/// field may be required on the create form and optional on the edit form.
#[must_use]
pub fn field_descriptor(field: &Field, mode: Mode) -> Value {
    let mut descriptor = Map::new();
    descriptor.insert("component".into(), json!(field.kind.as_str()));
    descriptor.insert("name".into(), json!(field.name));
    descriptor.insert("label".into(), json!(field.effective_label()));
    descriptor.insert("required".into(), json!(is_required(field, mode)));

    if let Some(placeholder) = &field.placeholder {
        descriptor.insert("placeholder".into(), json!(placeholder));
    }
    if let Some(help) = &field.help {
        descriptor.insert("help".into(), json!(help));
    }
    if let Some(default) = &field.default {
        descriptor.insert("default".into(), default.clone());
    }
    if field.kind.has_options() || !field.options.is_empty() {
        descriptor.insert("options".into(), json!(field.options));
    }
    if !field.when.is_empty() {
        let branches: Vec<Value> = field
            .when
            .items()
            .iter()
            .map(|item| {
                json!({
                    "condition": item.condition(),
                    "body": item
                        .body
                        .iter()
                        .map(|nested| field_descriptor(nested, mode))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        descriptor.insert("when".into(), Value::Array(branches));
    }

    Value::Object(descriptor)
}

fn is_required(field: &Field, mode: Mode) -> bool {
    let mode_rules = if mode.uses_creation_rules() {
        &field.creation_rules
    } else {
        &field.update_rules
    };
    field.rules.iter().chain(mode_rules).any(crate::rules::Rule::is_required)
}
