//! Per-request validation state

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the request is doing to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Creating a new record
    Creating,
    /// Editing an existing record
    Editing,
    /// Importing new records in bulk
    Importing,
}

impl Mode {
    /// Infer the mode from the last segment of a request path
    ///
    /// ```rust
    /// use acton_admin::validation::Mode;
    ///
    /// assert_eq!(Mode::from_path("/admin/users/store"), Some(Mode::Creating));
    /// assert_eq!(Mode::from_path("/admin/users/7/edit/"), Some(Mode::Editing));
    /// assert_eq!(Mode::from_path("/admin/users"), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let last = path.split('/').rev().find(|segment| !segment.is_empty())?;
        match last {
            "create" | "store" => Some(Self::Creating),
            "edit" | "update" => Some(Self::Editing),
            "import" => Some(Self::Importing),
            _ => None,
        }
    }

    /// Whether creation rules apply (creating and importing)
    #[must_use]
    pub const fn uses_creation_rules(self) -> bool {
        matches!(self, Self::Creating | Self::Importing)
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Creating => "creating",
            Self::Editing => "editing",
            Self::Importing => "importing",
        }
    }
}

/// Everything a validation run knows about the current request
///
/// `submitted` is what the rules check. `current` is what `When` conditions
/// are evaluated against; it defaults to the submission and can be replaced
/// with a partial view, e.g. the sibling values present in one import row.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    path: String,
    submitted: Map<String, Value>,
    current: Option<Map<String, Value>>,
}

impl ValidationContext {
    /// Create a context for `path` with the submitted values
    #[must_use]
    pub fn new(path: impl Into<String>, submitted: Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            submitted,
            current: None,
        }
    }

    /// Create a context from any JSON value; non-objects yield an empty submission
    #[must_use]
    pub fn from_value(path: impl Into<String>, submitted: Value) -> Self {
        let submitted = match submitted {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(path, submitted)
    }

    /// Evaluate `When` conditions against `values` instead of the submission
    #[must_use]
    pub fn with_current_values(mut self, values: Map<String, Value>) -> Self {
        self.current = Some(values);
        self
    }

    /// Request path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Mode inferred from the path
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        Mode::from_path(&self.path)
    }

    /// Submitted values checked by the rules
    #[must_use]
    pub const fn submitted(&self) -> &Map<String, Value> {
        &self.submitted
    }

    /// Values `When` conditions are evaluated against
    #[must_use]
    pub fn current_values(&self) -> &Map<String, Value> {
        self.current.as_ref().unwrap_or(&self.submitted)
    }
}

/// Look up a possibly dotted field name
///
/// The exact key wins; otherwise `a.b.0` walks objects by key and arrays by
/// index.
///
/// ```rust
/// use acton_admin::validation::lookup_value;
/// use serde_json::json;
///
/// let data = json!({"items": [{"sku": "A-1"}], "a.b": 1});
/// let data = data.as_object().unwrap();
/// assert_eq!(lookup_value(data, "items.0.sku"), Some(&json!("A-1")));
/// assert_eq!(lookup_value(data, "a.b"), Some(&json!(1)));
/// assert_eq!(lookup_value(data, "items.3.sku"), None);
/// ```
#[must_use]
pub fn lookup_value<'a>(data: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    if let Some(value) = data.get(name) {
        return Some(value);
    }

    let mut segments = name.split('.');
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Missing-equivalent values: null and the empty string
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_from_path() {
        assert_eq!(Mode::from_path("/admin/posts/create"), Some(Mode::Creating));
        assert_eq!(Mode::from_path("/admin/posts/store"), Some(Mode::Creating));
        assert_eq!(Mode::from_path("/admin/posts/3/edit"), Some(Mode::Editing));
        assert_eq!(Mode::from_path("/admin/posts/3/update"), Some(Mode::Editing));
        assert_eq!(Mode::from_path("/admin/posts/import"), Some(Mode::Importing));
        assert_eq!(Mode::from_path("/admin/posts/store?x=1"), Some(Mode::Creating));
        assert_eq!(Mode::from_path("/admin/posts/3"), None);
        assert_eq!(Mode::from_path(""), None);
    }

    #[test]
    fn test_only_last_segment_counts() {
        assert_eq!(Mode::from_path("/admin/create/list"), None);
    }

    #[test]
    fn test_import_uses_creation_rules() {
        assert!(Mode::Importing.uses_creation_rules());
        assert!(Mode::Creating.uses_creation_rules());
        assert!(!Mode::Editing.uses_creation_rules());
    }

    #[test]
    fn test_current_values_default_to_submission() {
        let ctx = ValidationContext::from_value("/admin/users/store", json!({"a": 1}));
        assert_eq!(ctx.current_values().get("a"), Some(&json!(1)));
        assert_eq!(ctx.mode(), Some(Mode::Creating));

        let ctx = ctx.with_current_values(Map::new());
        assert!(ctx.current_values().is_empty());
        assert_eq!(ctx.submitted().get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_non_object_submission_is_empty() {
        let ctx = ValidationContext::from_value("/x/store", json!([1, 2]));
        assert!(ctx.submitted().is_empty());
    }

    #[test]
    fn test_blank_values() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!("")));
        assert!(!is_blank(&json!(" ")));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!([])));
    }

    #[test]
    fn test_lookup_through_scalar_fails() {
        let data = json!({"a": 1});
        assert_eq!(lookup_value(data.as_object().unwrap(), "a.b"), None);
    }
}
