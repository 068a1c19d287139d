//! Server-side evaluation of `When` conditions
//!
//! Values keep their JSON types here: `2 > 10` is false and `"b" > "a"` is
//! true, while the client-side expression compares strings only.

use std::cmp::Ordering;

use serde_json::Value;

use super::{Operator, WhenItem};
use crate::validation::{is_blank, lookup_value, ValidationContext};

/// Whether `item`'s branch applies to the request described by `ctx`
///
/// A controlling field that is missing, null or an empty string leaves the
/// branch inactive whatever the operator.
#[must_use]
pub fn is_active(item: &WhenItem, ctx: &ValidationContext) -> bool {
    let Some(value) = lookup_value(ctx.current_values(), &item.condition_name) else {
        return false;
    };
    if is_blank(value) {
        return false;
    }

    let option = &item.option;
    match item.operator {
        Operator::Eq => values_equal(value, option),
        Operator::Ne => !values_equal(value, option),
        Operator::Gt => compare(value, option) == Some(Ordering::Greater),
        Operator::Lt => compare(value, option) == Some(Ordering::Less),
        Operator::Le => matches!(compare(value, option), Some(Ordering::Less | Ordering::Equal)),
        Operator::Ge => matches!(
            compare(value, option),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Has | Operator::In => contains(value, option),
    }
}

/// Equality by natural type: numbers compare by value, so `2.0` equals `2`
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => compare(left, right) == Some(Ordering::Equal),
        _ => left == right,
    }
}

/// Natural ordering between two values of the same JSON type
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
        },
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Membership in either direction
///
/// A list option asks whether the value is one of its elements. A scalar
/// option asks whether it occurs inside the value: as a substring of a string
/// value or as an element of a list value.
fn contains(value: &Value, option: &Value) -> bool {
    if let Value::Array(options) = option {
        return options.iter().any(|candidate| values_equal(candidate, value));
    }
    match (value, option) {
        (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
        (Value::String(haystack), Value::Number(_) | Value::Bool(_)) => {
            haystack.contains(option.to_string().as_str())
        }
        (Value::Array(items), _) => items.iter().any(|item| values_equal(item, option)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationContext;
    use proptest::prelude::*;
    use serde_json::json;

    fn ctx(values: Value) -> ValidationContext {
        ValidationContext::from_value("/admin/users/store", values)
    }

    fn item(operator: &str, option: Value) -> WhenItem {
        WhenItem::new("field", Operator::parse(operator), option)
    }

    #[test]
    fn test_missing_field_is_inactive_for_every_operator() {
        for op in ["=", "!=", ">", "<", "<=", ">=", "has", "in"] {
            assert!(!is_active(&item(op, json!(1)), &ctx(json!({}))), "operator {op}");
        }
    }

    #[test]
    fn test_empty_string_is_inactive() {
        assert!(!is_active(&item("!=", json!("x")), &ctx(json!({"field": ""}))));
        assert!(!is_active(&item("=", json!(null)), &ctx(json!({"field": null}))));
    }

    #[test]
    fn test_equality_keeps_types() {
        assert!(is_active(&item("=", json!(2)), &ctx(json!({"field": 2}))));
        assert!(!is_active(&item("=", json!(2)), &ctx(json!({"field": "2"}))));
        assert!(is_active(&item("!=", json!(2)), &ctx(json!({"field": 3}))));
    }

    #[test]
    fn test_ordering_is_numeric_server_side() {
        // The client-side expression would compare '10' > '9' as strings and say false.
        assert!(is_active(&item(">", json!(9)), &ctx(json!({"field": 10}))));
        assert!(is_active(&item(">=", json!(1.5)), &ctx(json!({"field": 1.5}))));
        assert!(is_active(&item("<", json!(10)), &ctx(json!({"field": 9}))));
        assert!(is_active(&item("<=", json!(9)), &ctx(json!({"field": 9}))));
        assert!(!is_active(&item("<", json!(9)), &ctx(json!({"field": 9}))));
    }

    #[test]
    fn test_integer_and_float_agree_across_operators() {
        let values = ctx(json!({"field": 2.0}));
        assert!(is_active(&item("=", json!(2)), &values));
        assert!(!is_active(&item("!=", json!(2)), &values));
        assert!(is_active(&item(">=", json!(2)), &values));
        assert!(is_active(&item("<=", json!(2)), &values));
        assert!(is_active(&item("in", json!([1, 2, 3])), &values));
        assert!(is_active(
            &item("has", json!(2)),
            &ctx(json!({"field": [1.0, 2.0]}))
        ));
    }

    #[test]
    fn test_ordering_across_types_is_inactive() {
        assert!(!is_active(&item(">", json!(1)), &ctx(json!({"field": "5"}))));
    }

    #[test]
    fn test_string_ordering_is_lexicographic() {
        assert!(is_active(&item(">", json!("apple")), &ctx(json!({"field": "banana"}))));
    }

    #[test]
    fn test_has_substring() {
        let has_admin = item("has", json!("admin"));
        assert!(is_active(&has_admin, &ctx(json!({"field": "superadmin"}))));
        assert!(!is_active(&has_admin, &ctx(json!({"field": "user"}))));
    }

    #[test]
    fn test_has_element_of_list_value() {
        let has_admin = item("has", json!("admin"));
        assert!(is_active(&has_admin, &ctx(json!({"field": ["editor", "admin"]}))));
        assert!(!is_active(&has_admin, &ctx(json!({"field": ["editor"]}))));
    }

    #[test]
    fn test_in_and_has_are_symmetric() {
        let values = ctx(json!({"field": "b"}));
        assert!(is_active(&item("in", json!(["a", "b"])), &values));
        assert!(is_active(&item("has", json!(["a", "b"])), &values));
        assert!(is_active(
            &item("in", json!("b")),
            &ctx(json!({"field": "abc"}))
        ));
    }

    #[test]
    fn test_unknown_operator_uses_equality() {
        assert!(is_active(&item("like", json!("x")), &ctx(json!({"field": "x"}))));
        assert!(!is_active(&item("like", json!("x")), &ctx(json!({"field": "xy"}))));
    }

    #[test]
    fn test_dotted_condition_name() {
        let nested = WhenItem::new("profile.kind", Operator::Eq, json!("company"));
        assert!(is_active(
            &nested,
            &ctx(json!({"profile": {"kind": "company"}}))
        ));
    }

    #[test]
    fn test_current_values_override_submission() {
        let context = ValidationContext::from_value("/admin/users/update", json!({"field": 1}))
            .with_current_values(json!({"field": 2}).as_object().cloned().unwrap());
        assert!(is_active(&item("=", json!(2)), &context));
    }

    proptest! {
        #[test]
        fn prop_in_matches_set_membership(value in -5i64..10) {
            let when = item("in", json!([1, 2, 3]));
            let active = is_active(&when, &ctx(json!({"field": value})));
            prop_assert_eq!(active, (1..=3).contains(&value));
        }

        #[test]
        fn prop_missing_field_is_never_active(op in prop::sample::select(vec!["=", "!=", ">", "<", "<=", ">=", "has", "in", "?"])) {
            let active = is_active(&item(op, json!([1])), &ctx(json!({"other": 1})));
            prop_assert!(!active);
        }
    }
}
