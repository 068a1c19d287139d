//! Admin resources and their registry
//!
//! A [`Resource`] is one admin-managed entity: a name used in URLs, a title
//! and the fields of its form. Resources are registered once at startup in a
//! [`ResourceRegistry`] and shared read-only across requests.
//!
//! ```rust
//! use acton_admin::fields::{ComponentKind, Field};
//! use acton_admin::resource::{Resource, ResourceRegistry};
//! use acton_admin::rules::Rule;
//!
//! let mut registry = ResourceRegistry::new();
//! registry.register(
//!     Resource::new("users", "Users")
//!         .field(Field::new("email", ComponentKind::Email).rule(Rule::required("Email is required"))),
//! );
//!
//! assert!(registry.get("users").is_some());
//! ```

mod descriptor;

pub use descriptor::field_descriptor;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::fields::Field;
use crate::validation::Mode;

/// One admin-managed entity
#[derive(Debug, Clone)]
pub struct Resource {
    /// URL name, e.g. `users`
    pub name: String,
    /// Display title
    pub title: String,
    /// Form fields in display order
    pub fields: Vec<Field>,
}

impl Resource {
    /// Create a resource without fields
    #[must_use]
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Form descriptor for `mode`
    #[must_use]
    pub fn form_descriptor(&self, mode: Mode) -> Value {
        json!({
            "resource": self.name,
            "title": self.title,
            "mode": mode.as_str(),
            "fields": self
                .fields
                .iter()
                .map(|field| field_descriptor(field, mode))
                .collect::<Vec<_>>(),
        })
    }
}

/// Resources by name
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<String, Arc<Resource>>,
}

impl ResourceRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource, replacing any previous one with the same name
    pub fn register(&mut self, resource: Resource) {
        if self.resources.contains_key(&resource.name) {
            tracing::warn!(resource = %resource.name, "replacing registered resource");
        }
        self.resources
            .insert(resource.name.clone(), Arc::new(resource));
    }

    /// Look up a resource by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Resource>> {
        self.resources.get(name).cloned()
    }

    /// Registered resource names in sorted order
    #[must_use]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Number of registered resources
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
