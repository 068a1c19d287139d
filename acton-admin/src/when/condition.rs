//! Comparison operators and client-side condition expressions
//!
//! The expression produced by [`build_condition`] is never evaluated on the
//! server. It is shipped inside the form descriptor and evaluated by the
//! frontend renderer, which compares everything as strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operator used by a [`WhenItem`](super::WhenItem)
///
/// Parsing never fails: unknown tokens fall back to [`Operator::Eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// `=`
    #[default]
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `has`: containment of the option inside the value
    Has,
    /// `in`: membership of the value inside the option
    In,
}

impl Operator {
    /// Parse an operator token, falling back to `=` for anything unknown
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "!=" => Self::Ne,
            ">" => Self::Gt,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">=" => Self::Ge,
            "has" => Self::Has,
            "in" => Self::In,
            _ => Self::Eq,
        }
    }

    /// The operator token
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Has => "has",
            Self::In => "in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Operator {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl From<String> for Operator {
    fn from(token: String) -> Self {
        Self::parse(&token)
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        operator.as_str().to_string()
    }
}

/// Build the JavaScript condition evaluated by the frontend renderer
///
/// Ordering operators compare the stringified field against the quoted
/// operand, so `'10' > '9'` is false on the client. The server-side
/// resolver compares natural values instead.
///
/// ```rust
/// use acton_admin::when::{build_condition, Operator};
/// use serde_json::json;
///
/// assert_eq!(
///     build_condition("status", Operator::Eq, &json!(2)),
///     "String(status) === '2'"
/// );
/// assert_eq!(
///     build_condition("role", Operator::In, &json!(["a", "b"])),
///     r#"["a","b"].indexOf(role) != -1"#
/// );
/// ```
#[must_use]
pub fn build_condition(field: &str, operator: Operator, operand: &Value) -> String {
    match operator {
        Operator::Ne => format!("String({field}) !== '{}'", operand_text(operand)),
        Operator::Gt | Operator::Lt | Operator::Le | Operator::Ge => {
            format!("String({field}) {operator} '{}'", operand_text(operand))
        }
        Operator::Has => format!(
            "String({field}).indexOf('{}') != -1",
            operand_text(operand)
        ),
        Operator::In => format!("{operand}.indexOf({field}) != -1"),
        Operator::Eq => format!("String({field}) === '{}'", operand_text(operand)),
    }
}

/// Operand as it appears between quotes: strings raw, everything else as JSON
fn operand_text(operand: &Value) -> String {
    match operand {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equality_forms() {
        assert_eq!(
            build_condition("status", Operator::Eq, &json!("on")),
            "String(status) === 'on'"
        );
        assert_eq!(
            build_condition("status", Operator::Ne, &json!(0)),
            "String(status) !== '0'"
        );
    }

    #[test]
    fn test_ordering_forms_are_string_comparisons() {
        assert_eq!(
            build_condition("age", Operator::Gt, &json!(18)),
            "String(age) > '18'"
        );
        assert_eq!(
            build_condition("age", Operator::Lt, &json!(18)),
            "String(age) < '18'"
        );
        assert_eq!(
            build_condition("age", Operator::Le, &json!(18)),
            "String(age) <= '18'"
        );
        assert_eq!(
            build_condition("age", Operator::Ge, &json!(18)),
            "String(age) >= '18'"
        );
    }

    #[test]
    fn test_has_form() {
        assert_eq!(
            build_condition("roles", Operator::Has, &json!("admin")),
            "String(roles).indexOf('admin') != -1"
        );
    }

    #[test]
    fn test_in_form_serializes_operand() {
        assert_eq!(
            build_condition("level", Operator::In, &json!([1, 2, 3])),
            "[1,2,3].indexOf(level) != -1"
        );
    }

    #[test]
    fn test_unknown_operator_degrades_to_equality() {
        let operator = Operator::parse("~=");
        assert_eq!(operator, Operator::Eq);
        assert_eq!(
            build_condition("kind", operator, &json!("x")),
            "String(kind) === 'x'"
        );
    }

    #[test]
    fn test_operator_round_trips_through_serde() {
        let parsed: Vec<Operator> = serde_json::from_value(json!(["in", ">=", "bogus"])).unwrap();
        assert_eq!(parsed, vec![Operator::In, Operator::Ge, Operator::Eq]);
        assert_eq!(serde_json::to_value(Operator::Has).unwrap(), json!("has"));
    }
}
