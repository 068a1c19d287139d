//! Field definitions and component kinds
//!
//! Defines the widget kinds a resource form can use and the [`Field`]
//! value that carries a widget's configuration, its rules and its
//! conditional branches.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rules::Rule;
use crate::when::{Operator, When, WhenItem};

/// Frontend component used to render a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    /// Single-line text input (default)
    #[default]
    Input,
    /// Email input
    Email,
    /// Password input (masked)
    Password,
    /// Numeric input
    Number,
    /// Multi-line text
    Textarea,
    /// Dropdown
    Select,
    /// Dropdown allowing several values
    MultipleSelect,
    /// Radio button group
    Radio,
    /// Checkbox group
    Checkbox,
    /// On/off toggle
    Switch,
    /// Date picker
    Date,
    /// Date and time picker
    DateTime,
    /// File upload
    Upload,
    /// Hidden input
    Hidden,
}

impl ComponentKind {
    /// Component name understood by the frontend renderer
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::MultipleSelect => "multiple-select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Switch => "switch",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Upload => "upload",
            Self::Hidden => "hidden",
        }
    }

    /// Whether the component offers a fixed list of options
    #[must_use]
    pub const fn has_options(&self) -> bool {
        matches!(
            self,
            Self::Select | Self::MultipleSelect | Self::Radio | Self::Checkbox
        )
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Option for select, radio and checkbox components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Submitted value
    pub value: Value,
    /// Display text
    pub label: String,
}

impl SelectOption {
    /// Create a new option
    #[must_use]
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A named input on a resource form
///
/// Rules attached through [`Field::rule`], [`Field::creation_rule`] and
/// [`Field::update_rule`] take the field's name, whatever name they carried
/// before.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name (submission key; may be dotted)
    pub name: String,
    /// Component used to render it
    pub kind: ComponentKind,
    /// Label text
    pub label: Option<String>,
    /// Placeholder text
    pub placeholder: Option<String>,
    /// Help text shown below the field
    pub help: Option<String>,
    /// Default value
    pub default: Option<Value>,
    /// Choices for option-based components
    pub options: Vec<SelectOption>,
    /// Rules checked in every mode
    pub rules: Vec<Rule>,
    /// Rules checked when creating or importing
    pub creation_rules: Vec<Rule>,
    /// Rules checked when editing
    pub update_rules: Vec<Rule>,
    /// Conditional branches
    pub when: When,
}

impl Field {
    /// Create a field rendered with `kind`
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            placeholder: None,
            help: None,
            default: None,
            options: Vec::new(),
            rules: Vec::new(),
            creation_rules: Vec::new(),
            update_rules: Vec::new(),
            when: When::new(),
        }
    }

    /// Set the label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the placeholder
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the help text
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set the default value
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Add a choice
    #[must_use]
    pub fn option(mut self, value: impl Into<Value>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(value, label));
        self
    }

    /// Add a rule checked in every mode
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        let rule = rule.bound_to(&self.name);
        self.rules.push(rule);
        self
    }

    /// Add a rule checked only when creating (and importing)
    #[must_use]
    pub fn creation_rule(mut self, rule: Rule) -> Self {
        let rule = rule.bound_to(&self.name);
        self.creation_rules.push(rule);
        self
    }

    /// Add a rule checked only when editing
    #[must_use]
    pub fn update_rule(mut self, rule: Rule) -> Self {
        let rule = rule.bound_to(&self.name);
        self.update_rules.push(rule);
        self
    }

    /// Attach a branch controlled by this field's own value
    #[must_use]
    pub fn when(self, operator: Operator, option: impl Into<Value>, body: Vec<Self>) -> Self {
        let item = WhenItem::new(self.name.clone(), operator, option).body(body);
        self.when_item(item)
    }

    /// Attach a branch controlled by any field
    #[must_use]
    pub fn when_item(mut self, item: WhenItem) -> Self {
        self.when.push(item);
        self
    }

    /// Label to display, falling back to the field name
    #[must_use]
    pub fn effective_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_kind_as_str() {
        assert_eq!(ComponentKind::MultipleSelect.as_str(), "multiple-select");
        assert_eq!(ComponentKind::DateTime.to_string(), "date-time");
        assert_eq!(
            serde_json::to_value(ComponentKind::MultipleSelect).unwrap(),
            json!("multiple-select")
        );
    }

    #[test]
    fn test_option_components() {
        assert!(ComponentKind::Radio.has_options());
        assert!(!ComponentKind::Textarea.has_options());
    }

    #[test]
    fn test_rules_take_field_name() {
        let shared = Rule::required("Required").bound_to("somewhere-else");
        let field = Field::new("email", ComponentKind::Email)
            .rule(shared.clone())
            .creation_rule(shared.clone())
            .update_rule(shared);

        assert_eq!(field.rules[0].name, "email");
        assert_eq!(field.creation_rules[0].name, "email");
        assert_eq!(field.update_rules[0].name, "email");
    }

    #[test]
    fn test_when_defaults_to_own_name() {
        let field = Field::new("status", ComponentKind::Radio)
            .option(1, "Draft")
            .option(2, "Published")
            .when(Operator::Eq, 2, vec![Field::new("published_at", ComponentKind::Date)]);

        let item = &field.when.items()[0];
        assert_eq!(item.condition_name, "status");
        assert_eq!(item.option, json!(2));
        assert_eq!(field.options.len(), 2);
    }

    #[test]
    fn test_effective_label() {
        let mut field = Field::new("email", ComponentKind::Email);
        assert_eq!(field.effective_label(), "email");

        field.label = Some("Email Address".into());
        assert_eq!(field.effective_label(), "Email Address");
    }
}
