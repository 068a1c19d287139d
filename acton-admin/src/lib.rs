//! acton-admin: declarative admin resources with conditional fields
//!
//! Resources are described as trees of [`Field`](fields::Field)s. A field
//! carries validation [`Rule`](rules::Rule)s and may reveal nested fields
//! through [`When`](when::When) branches. The same definition drives two
//! consumers:
//!
//! - the frontend, which receives JSON form descriptors where each branch
//!   carries a JavaScript condition to toggle its fields
//! - the server, which re-evaluates every branch against the submitted
//!   values, collects the rules that apply and checks them in order
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_admin::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     acton_admin::observability::init()?;
//!
//!     let mut registry = ResourceRegistry::new();
//!     registry.register(
//!         Resource::new("users", "Users")
//!             .field(
//!                 Field::new("email", ComponentKind::Email)
//!                     .rule(Rule::required("Email is required"))
//!                     .rule(Rule::unique("users", "email", "Email is taken").ignore("id", "{id}")),
//!             )
//!             .field(
//!                 Field::new("role", ComponentKind::Select)
//!                     .option("admin", "Admin")
//!                     .option("editor", "Editor")
//!                     .when(
//!                         Operator::Eq,
//!                         "editor",
//!                         vec![Field::new("section", ComponentKind::Input)
//!                             .rule(Rule::required("Pick a section"))],
//!                     ),
//!             ),
//!     );
//!
//!     let config = AdminConfig::load_for_service("backoffice")?;
//!     let state = AdminState::connect(config, registry).await?;
//!
//!     let listener = tokio::net::TcpListener::bind(&state.config().service.listen_addr).await?;
//!     axum::serve(listener, acton_admin::handlers::router(state)).await?;
//!     Ok(())
//! }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod fields;
pub mod handlers;
pub mod lookup;
pub mod observability;
pub mod resource;
pub mod rules;
pub mod state;
pub mod validation;
pub mod when;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_admin::prelude::*;
    //! ```

    // Definitions
    pub use crate::fields::{ComponentKind, Field, SelectOption};
    pub use crate::resource::{Resource, ResourceRegistry};
    pub use crate::rules::{Rule, RuleKind};
    pub use crate::when::{Operator, When, WhenItem};

    // Validation
    pub use crate::validation::{
        collect_rules, validate, validate_request, Mode, ValidationContext, Violation,
    };

    // Lookups
    pub use crate::lookup::{InMemoryLookup, PgUniqueLookup, UniqueLookup, UniqueQuery};

    // Application
    pub use crate::config::AdminConfig;
    pub use crate::error::AdminError;
    pub use crate::state::AdminState;

    // Re-export key dependencies
    pub use axum;
    pub use serde_json::json;
}
