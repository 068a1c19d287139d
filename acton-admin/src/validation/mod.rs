//! Request validation for resource submissions
//!
//! The pipeline has two steps:
//!
//! 1. [`collect_rules`] walks the field tree and picks the rules that apply
//!    to the request's [`Mode`], descending into `When` branches whose
//!    condition holds for the submitted values.
//! 2. [`validate`] checks those rules in order and stops at the first one
//!    that fails.
//!
//! Definitions are shared and immutable; everything request-specific lives in
//! a [`ValidationContext`].
//!
//! # Example
//!
//! ```rust
//! use acton_admin::fields::{ComponentKind, Field};
//! use acton_admin::lookup::InMemoryLookup;
//! use acton_admin::rules::Rule;
//! use acton_admin::validation::{validate_request, ValidationContext};
//! use acton_admin::when::Operator;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), acton_admin::error::AdminError> {
//! let fields = vec![Field::new("status", ComponentKind::Radio)
//!     .rule(Rule::required("Pick a status"))
//!     .when(
//!         Operator::Eq,
//!         2,
//!         vec![Field::new("age", ComponentKind::Number).rule(Rule::required("Age is required"))],
//!     )];
//!
//! let ctx = ValidationContext::from_value("/admin/people/store", json!({"status": 2}));
//! let violation = validate_request(&fields, &ctx, &InMemoryLookup::new()).await?;
//! assert_eq!(violation.map(|v| v.message), Some("Age is required".to_string()));
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod context;
mod evaluate;

pub use aggregate::{collect_rules, collect_rules_for_context};
pub(crate) use context::is_blank;
pub use context::{lookup_value, Mode, ValidationContext};
pub use evaluate::{validate, validate_request, Violation};
