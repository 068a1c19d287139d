//! Validation rules attached to fields
//!
//! A [`Rule`] pairs one constraint ([`RuleKind`]) with the message shown to
//! the user when the constraint fails. Rules are built once, attached to a
//! [`Field`](crate::fields::Field) (which stamps its own name onto the rule)
//! and never mutated afterwards.
//!
//! ```rust
//! use acton_admin::rules::Rule;
//!
//! let rules = vec![
//!     Rule::required("Email is required"),
//!     Rule::max(120, "Email is too long"),
//!     Rule::unique("users", "email", "Email already taken").ignore("id", "{id}"),
//! ];
//! assert_eq!(rules[2].kind.name(), "unique");
//! ```

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::AdminError;
use crate::validation::lookup_value;

/// A single validation constraint bound to a field
#[derive(Debug, Clone)]
pub struct Rule {
    /// Name of the field this rule checks; overwritten when attached to a field
    pub name: String,
    /// The constraint itself
    pub kind: RuleKind,
    /// User-facing failure message
    pub message: String,
}

/// Constraint kinds understood by the validator
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Value must be present and not an empty string
    Required,
    /// String values must have at least this many characters
    Min(u64),
    /// String values must have at most this many characters
    Max(u64),
    /// String values must fully match the pattern
    Regexp(Pattern),
    /// No other row may hold the same value
    Unique(UniqueRule),
}

impl RuleKind {
    /// Short identifier for logs and descriptors
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::Regexp(_) => "regexp",
            Self::Unique(_) => "unique",
        }
    }
}

/// A regular expression compiled for whole-value matching
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: Regex,
}

impl Pattern {
    /// Compile `source` so that it only matches an entire value
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if the pattern does not compile.
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let compiled = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self { source, compiled })
    }

    /// The pattern as written in the rule definition
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `text` matches the pattern from start to end
    #[must_use]
    pub fn is_full_match(&self, text: &str) -> bool {
        self.compiled.is_match(text)
    }
}

/// Uniqueness constraint against a table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueRule {
    /// Table to search
    pub table: String,
    /// Column holding the value
    pub column: String,
    /// Row to leave out of the search, usually the record being edited
    pub ignore: Option<IgnoreClause>,
}

/// Excludes one row from a uniqueness lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreClause {
    /// Column identifying the row to skip
    pub column: String,
    /// Either a `{key}` placeholder read from the submission or a literal value
    pub value: String,
}

impl IgnoreClause {
    /// Resolve the value to exclude against submitted data
    ///
    /// `{id}` reads `id` from the submission and yields `None` when it is
    /// missing, null or empty. Anything else is taken literally.
    #[must_use]
    pub fn resolve(&self, submitted: &Map<String, Value>) -> Option<Value> {
        let Some(key) = self
            .value
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        else {
            return Some(Value::String(self.value.clone()));
        };

        match lookup_value(submitted, key.trim()) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value.clone()),
        }
    }
}

impl Rule {
    fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            kind,
            message: message.into(),
        }
    }

    /// Value must be submitted and non-empty
    #[must_use]
    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, message)
    }

    /// Minimum string length in characters
    #[must_use]
    pub fn min(length: u64, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Min(length), message)
    }

    /// Maximum string length in characters
    #[must_use]
    pub fn max(length: u64, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Max(length), message)
    }

    /// String values must match `pattern` in full
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidRule`] if the pattern does not compile.
    pub fn regexp(pattern: &str, message: impl Into<String>) -> Result<Self, AdminError> {
        let pattern = Pattern::new(pattern).map_err(|err| AdminError::InvalidRule {
            rule: "regexp",
            definition: pattern.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self::new(RuleKind::Regexp(pattern), message))
    }

    /// Value must not already exist in `table.column`
    #[must_use]
    pub fn unique(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            RuleKind::Unique(UniqueRule {
                table: table.into(),
                column: column.into(),
                ignore: None,
            }),
            message,
        )
    }

    /// Skip the row whose `column` equals `value` during a uniqueness lookup
    ///
    /// Has no effect on rules other than [`RuleKind::Unique`].
    #[must_use]
    pub fn ignore(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        if let RuleKind::Unique(unique) = &mut self.kind {
            unique.ignore = Some(IgnoreClause {
                column: column.into(),
                value: value.into(),
            });
        }
        self
    }

    /// Bind the rule to a field name
    #[must_use]
    pub(crate) fn bound_to(mut self, field: &str) -> Self {
        field.clone_into(&mut self.name);
        self
    }

    /// Whether this rule demands a value
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self.kind, RuleKind::Required)
    }
}
