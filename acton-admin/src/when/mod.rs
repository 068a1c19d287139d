//! Conditional field branches
//!
//! A [`When`] is an ordered list of [`WhenItem`]s. Each item names a
//! controlling field, an [`Operator`] and an operand; when the condition holds
//! the item's body fields are shown on the form and their rules are enforced.
//!
//! The same item is evaluated twice, in two different ways:
//!
//! - [`build_condition`] turns it into a string expression for the frontend,
//!   which compares values as strings.
//! - [`is_active`] decides on the server whether the body's rules apply,
//!   comparing values with their natural JSON types.
//!
//! # Example
//!
//! ```rust
//! use acton_admin::fields::{ComponentKind, Field};
//! use acton_admin::rules::Rule;
//! use acton_admin::when::Operator;
//! use serde_json::json;
//!
//! let status = Field::new("status", ComponentKind::Radio)
//!     .rule(Rule::required("Pick a status"))
//!     .when(
//!         Operator::Eq,
//!         json!(2),
//!         vec![Field::new("age", ComponentKind::Number).rule(Rule::required("Age is required"))],
//!     );
//!
//! assert_eq!(status.when.items().len(), 1);
//! ```

mod condition;
mod resolver;

pub use condition::{build_condition, Operator};
pub use resolver::is_active;

use serde_json::Value;

use crate::fields::Field;

/// One conditional branch
#[derive(Debug, Clone)]
pub struct WhenItem {
    /// Field whose value is tested (may be dotted)
    pub condition_name: String,
    /// Comparison operator
    pub operator: Operator,
    /// Operand: a scalar or a list
    pub option: Value,
    /// Fields activated when the condition holds
    pub body: Vec<Field>,
}

impl WhenItem {
    /// Create a branch with an empty body
    #[must_use]
    pub fn new(condition_name: impl Into<String>, operator: Operator, option: impl Into<Value>) -> Self {
        Self {
            condition_name: condition_name.into(),
            operator,
            option: option.into(),
            body: Vec::new(),
        }
    }

    /// Set the fields activated by this branch
    #[must_use]
    pub fn body(mut self, fields: Vec<Field>) -> Self {
        self.body = fields;
        self
    }

    /// Client-side expression for this branch
    #[must_use]
    pub fn condition(&self) -> String {
        build_condition(&self.condition_name, self.operator, &self.option)
    }
}

/// Ordered set of conditional branches attached to a field
#[derive(Debug, Clone, Default)]
pub struct When {
    items: Vec<WhenItem>,
}

impl When {
    /// Create an empty set of branches
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a branch
    pub fn push(&mut self, item: WhenItem) {
        self.items.push(item);
    }

    /// Branches in attach order
    #[must_use]
    pub fn items(&self) -> &[WhenItem] {
        &self.items
    }

    /// Whether no branch is attached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
