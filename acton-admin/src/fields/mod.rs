//! Form fields for admin resources
//!
//! Fields are plain values built with chained setters. Once a resource is
//! registered its fields are shared read-only between requests.
//!
//! ```rust
//! use acton_admin::fields::{ComponentKind, Field};
//! use acton_admin::rules::Rule;
//!
//! let email = Field::new("email", ComponentKind::Email)
//!     .label("Email Address")
//!     .placeholder("you@example.com")
//!     .rule(Rule::required("Email is required"))
//!     .creation_rule(Rule::unique("users", "email", "Email already registered"));
//!
//! assert_eq!(email.rules[0].name, "email");
//! ```

mod field;

pub use field::{ComponentKind, Field, SelectOption};
