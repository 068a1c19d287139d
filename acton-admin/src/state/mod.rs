//! Application state shared by the admin handlers

use std::sync::Arc;

use crate::{
    config::AdminConfig,
    lookup::{InMemoryLookup, PgUniqueLookup, UniqueLookup},
    resource::ResourceRegistry,
};

/// State handed to every admin route
///
/// Cloning is cheap: every part sits behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use acton_admin::resource::{Resource, ResourceRegistry};
/// use acton_admin::state::AdminState;
///
/// let mut registry = ResourceRegistry::new();
/// registry.register(Resource::new("users", "Users"));
///
/// let state = AdminState::in_memory(registry);
/// assert!(state.registry().get("users").is_some());
/// ```
#[derive(Clone)]
pub struct AdminState {
    config: Arc<AdminConfig>,
    registry: Arc<ResourceRegistry>,
    lookup: Arc<dyn UniqueLookup>,
}

impl AdminState {
    /// Create state from its parts
    #[must_use]
    pub fn new(
        config: AdminConfig,
        registry: ResourceRegistry,
        lookup: Arc<dyn UniqueLookup>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            lookup,
        }
    }

    /// Default configuration with an empty in-memory lookup
    #[must_use]
    pub fn in_memory(registry: ResourceRegistry) -> Self {
        Self::new(
            AdminConfig::default(),
            registry,
            Arc::new(InMemoryLookup::new()),
        )
    }

    /// Connect to the configured database and use it for uniqueness lookups
    ///
    /// # Errors
    ///
    /// Returns an error if `database.url` is unset or the connection fails.
    pub async fn connect(config: AdminConfig, registry: ResourceRegistry) -> anyhow::Result<Self> {
        let pool = config.database.connect().await?;
        Ok(Self::new(
            config,
            registry,
            Arc::new(PgUniqueLookup::new(pool)),
        ))
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// Registered resources
    #[must_use]
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Uniqueness lookup backend
    #[must_use]
    pub fn lookup(&self) -> &dyn UniqueLookup {
        self.lookup.as_ref()
    }
}

impl std::fmt::Debug for AdminState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminState")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
