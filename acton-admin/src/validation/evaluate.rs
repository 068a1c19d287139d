//! Fail-fast rule evaluation
//!
//! Rules are checked in order and the first failure wins. Only the
//! uniqueness rule touches anything outside the submission; if that lookup
//! fails the error is returned as-is so callers can tell a broken rule
//! definition apart from bad user input.

use serde::Serialize;
use serde_json::{Map, Value};
use validator::ValidateLength;

use super::{collect_rules_for_context, is_blank, lookup_value, ValidationContext};
use crate::error::AdminError;
use crate::fields::Field;
use crate::lookup::{UniqueLookup, UniqueQuery};
use crate::rules::{Rule, RuleKind, UniqueRule};

/// The first rule a submission broke
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field the failing rule is bound to
    pub field: String,
    /// The rule's message
    pub message: String,
}

impl Violation {
    fn from_rule(rule: &Rule) -> Self {
        Self {
            field: rule.name.clone(),
            message: rule.message.clone(),
        }
    }
}

/// Check `rules` against `submitted` in order
///
/// Returns the first violation, or `None` when every rule passes.
///
/// - `required` fails on a missing, null or empty-string value.
/// - `min`/`max`/`regexp` only look at string values; anything else passes.
/// - `unique` asks `lookup` for matching rows, excluding the ignored row.
///
/// # Errors
///
/// Returns [`AdminError::Lookup`] if a uniqueness lookup fails.
pub async fn validate(
    rules: &[&Rule],
    submitted: &Map<String, Value>,
    lookup: &dyn UniqueLookup,
) -> Result<Option<Violation>, AdminError> {
    for rule in rules {
        if !passes(rule, submitted, lookup).await? {
            tracing::debug!(
                field = %rule.name,
                rule = rule.kind.name(),
                "validation rule failed"
            );
            return Ok(Some(Violation::from_rule(rule)));
        }
    }
    Ok(None)
}

/// Aggregate the rules for `ctx` and validate its submission
///
/// # Errors
///
/// Returns [`AdminError::Lookup`] if a uniqueness lookup fails.
pub async fn validate_request(
    fields: &[Field],
    ctx: &ValidationContext,
    lookup: &dyn UniqueLookup,
) -> Result<Option<Violation>, AdminError> {
    let rules = collect_rules_for_context(fields, ctx);
    tracing::trace!(
        path = ctx.path(),
        mode = ctx.mode().map(super::Mode::as_str),
        rules = rules.len(),
        "validating submission"
    );
    validate(&rules, ctx.submitted(), lookup).await
}

async fn passes(
    rule: &Rule,
    submitted: &Map<String, Value>,
    lookup: &dyn UniqueLookup,
) -> Result<bool, AdminError> {
    let value = lookup_value(submitted, &rule.name);
    let text = value.and_then(Value::as_str);

    let ok = match &rule.kind {
        RuleKind::Required => value.is_some_and(|value| !is_blank(value)),
        RuleKind::Min(min) => text.is_none_or(|text| text.validate_length(Some(*min), None, None)),
        RuleKind::Max(max) => text.is_none_or(|text| text.validate_length(None, Some(*max), None)),
        RuleKind::Regexp(pattern) => text.is_none_or(|text| pattern.is_full_match(text)),
        RuleKind::Unique(unique) => match value.filter(|value| !is_blank(value)) {
            Some(value) => is_unique(unique, value, submitted, lookup).await?,
            None => true,
        },
    };
    Ok(ok)
}

async fn is_unique(
    unique: &UniqueRule,
    value: &Value,
    submitted: &Map<String, Value>,
    lookup: &dyn UniqueLookup,
) -> Result<bool, AdminError> {
    let exclude = unique.ignore.as_ref().and_then(|ignore| {
        ignore
            .resolve(submitted)
            .map(|ignored| (ignore.column.clone(), ignored))
    });
    let query = UniqueQuery {
        table: unique.table.clone(),
        column: unique.column.clone(),
        value: value.clone(),
        exclude,
    };

    let count = lookup.count(&query).await?;
    Ok(count == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::ComponentKind;
    use crate::lookup::{LookupError, MockUniqueLookup};
    use crate::validation::{collect_rules, Mode};
    use crate::when::Operator;
    use proptest::prelude::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn bound(rule: Rule, name: &str) -> Rule {
        rule.bound_to(name)
    }

    fn no_lookup() -> MockUniqueLookup {
        let mut lookup = MockUniqueLookup::new();
        lookup.expect_count().never();
        lookup
    }

    #[tokio::test]
    async fn test_required() {
        let rule = bound(Rule::required("name required"), "name");
        let lookup = no_lookup();

        for missing in [json!({}), json!({"name": ""}), json!({"name": null})] {
            let result = validate(&[&rule], &data(missing), &lookup).await.unwrap();
            assert_eq!(result.unwrap().message, "name required");
        }
        for present in [json!({"name": "x"}), json!({"name": 0}), json!({"name": false})] {
            assert!(validate(&[&rule], &data(present), &lookup).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_length_bounds_count_characters() {
        let min = bound(Rule::min(3, "too short"), "code");
        let max = bound(Rule::max(4, "too long"), "code");
        let rules = [&min, &max];
        let lookup = no_lookup();

        let short = validate(&rules, &data(json!({"code": "ab"})), &lookup).await.unwrap();
        assert_eq!(short.unwrap().message, "too short");

        let long = validate(&rules, &data(json!({"code": "abcde"})), &lookup).await.unwrap();
        assert_eq!(long.unwrap().message, "too long");

        let accents = validate(&rules, &data(json!({"code": "éèê"})), &lookup).await.unwrap();
        assert!(accents.is_none());
    }

    #[tokio::test]
    async fn test_length_bounds_ignore_non_strings() {
        let min = bound(Rule::min(3, "too short"), "count");
        let lookup = no_lookup();
        assert!(validate(&[&min], &data(json!({"count": 1})), &lookup).await.unwrap().is_none());
        assert!(validate(&[&min], &data(json!({})), &lookup).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_regexp_requires_full_match() {
        let rule = bound(Rule::regexp(r"\d{3}", "three digits").unwrap(), "pin");
        let lookup = no_lookup();

        let bad = validate(&[&rule], &data(json!({"pin": "1234"})), &lookup).await.unwrap();
        assert_eq!(bad.unwrap().field, "pin");
        assert!(validate(&[&rule], &data(json!({"pin": "123"})), &lookup).await.unwrap().is_none());
        assert!(validate(&[&rule], &data(json!({"pin": 1234})), &lookup).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_excludes_ignored_row() {
        let rule = bound(
            Rule::unique("users", "email", "email taken").ignore("id", "{id}"),
            "email",
        );

        let mut lookup = MockUniqueLookup::new();
        lookup
            .expect_count()
            .withf(|query| {
                query.table == "users"
                    && query.column == "email"
                    && query.value == json!("a@x.com")
                    && query.exclude == Some(("id".to_string(), json!(5)))
            })
            .times(1)
            .returning(|_| Ok(0));

        let submitted = data(json!({"id": 5, "email": "a@x.com"}));
        assert!(validate(&[&rule], &submitted, &lookup).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_fails_when_row_exists() {
        let rule = bound(
            Rule::unique("users", "email", "email taken").ignore("id", "{id}"),
            "email",
        );

        let mut lookup = MockUniqueLookup::new();
        lookup.expect_count().times(1).returning(|_| Ok(1));

        let submitted = data(json!({"id": 5, "email": "a@x.com"}));
        let violation = validate(&[&rule], &submitted, &lookup).await.unwrap().unwrap();
        assert_eq!(violation.message, "email taken");
    }

    #[tokio::test]
    async fn test_unique_without_resolvable_ignore_searches_everything() {
        let rule = bound(
            Rule::unique("users", "email", "email taken").ignore("id", "{id}"),
            "email",
        );

        let mut lookup = MockUniqueLookup::new();
        lookup
            .expect_count()
            .withf(|query| query.exclude.is_none())
            .returning(|_| Ok(0));

        let submitted = data(json!({"email": "a@x.com"}));
        assert!(validate(&[&rule], &submitted, &lookup).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_skips_missing_value() {
        let rule = bound(Rule::unique("users", "email", "email taken"), "email");
        let lookup = no_lookup();
        assert!(validate(&[&rule], &data(json!({"email": ""})), &lookup).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_error_is_not_a_violation() {
        let rule = bound(Rule::unique("ghosts", "name", "taken"), "name");

        let mut lookup = MockUniqueLookup::new();
        lookup.expect_count().returning(|query| {
            Err(LookupError::UnknownTarget {
                table: query.table.clone(),
                column: query.column.clone(),
            })
        });

        let result = validate(&[&rule], &data(json!({"name": "casper"})), &lookup).await;
        assert!(matches!(result, Err(AdminError::Lookup(_))));
    }

    #[tokio::test]
    async fn test_first_failure_stops_evaluation() {
        let first = bound(Rule::required("first"), "a");
        let second = bound(Rule::unique("t", "b", "second"), "b");
        let lookup = no_lookup();

        let violation = validate(&[&first, &second], &data(json!({"b": "x"})), &lookup)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(violation.message, "first");
    }

    #[tokio::test]
    async fn test_status_branch_scenario() {
        let fields = vec![Field::new("status", ComponentKind::Radio)
            .rule(Rule::required("status required"))
            .when(
                Operator::Eq,
                2,
                vec![Field::new("age", ComponentKind::Number).rule(Rule::required("age required"))],
            )];
        let ctx = ValidationContext::from_value("/admin/people/store", json!({"status": 2}));
        let lookup = no_lookup();

        let rules = collect_rules(&fields, &ctx, Mode::Creating);
        let violation = validate(&rules, ctx.submitted(), &lookup).await.unwrap().unwrap();
        assert_eq!(violation.field, "age");
        assert_eq!(violation.message, "age required");

        let via_request = validate_request(&fields, &ctx, &lookup).await.unwrap();
        assert_eq!(via_request, Some(violation));
    }

    #[tokio::test]
    async fn test_nested_field_names() {
        let rule = bound(Rule::required("sku required"), "items.0.sku");
        let lookup = no_lookup();
        let ok = data(json!({"items": [{"sku": "A-1"}]}));
        let missing = data(json!({"items": [{}]}));

        assert!(validate(&[&rule], &ok, &lookup).await.unwrap().is_none());
        assert!(validate(&[&rule], &missing, &lookup).await.unwrap().is_some());
    }

    proptest! {
        #[test]
        fn prop_earliest_violated_rule_wins(present in prop::collection::vec(any::<bool>(), 1..8)) {
            let rules: Vec<Rule> = (0..present.len())
                .map(|i| bound(Rule::required(format!("rule {i}")), &format!("f{i}")))
                .collect();
            let refs: Vec<&Rule> = rules.iter().collect();
            let mut submitted = Map::new();
            for (i, keep) in present.iter().enumerate() {
                if *keep {
                    submitted.insert(format!("f{i}"), json!("x"));
                }
            }

            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let lookup = MockUniqueLookup::new();
            let result = runtime.block_on(validate(&refs, &submitted, &lookup)).unwrap();

            let expected = present.iter().position(|keep| !keep).map(|i| format!("rule {i}"));
            prop_assert_eq!(result.map(|violation| violation.message), expected);
        }
    }
}
