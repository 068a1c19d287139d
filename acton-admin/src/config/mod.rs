//! Configuration management for acton-admin
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_` prefix, `__` for nesting)
//! 2. `./config.toml` (development)
//! 3. `~/.config/acton-admin/{service}/config.toml` (user config, XDG)
//! 4. `/etc/acton-admin/{service}/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [service]
//! name = "backoffice"
//! listen_addr = "0.0.0.0:8080"
//!
//! [admin]
//! route_prefix = "/admin"
//!
//! [database]
//! url = "postgres://localhost/backoffice"
//! max_connections = 5
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_admin::config::AdminConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = AdminConfig::load_for_service("backoffice")?;
//! let prefix = &config.admin.route_prefix;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::AdminError;

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name used in logs
    pub name: String,

    /// Address the HTTP server binds to
    pub listen_addr: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "acton-admin".to_string(),
            listen_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Admin routing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Path every admin route is nested under
    pub route_prefix: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            route_prefix: "/admin".to_string(),
        }
    }
}

/// Database settings for the uniqueness lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL; no database is used when unset
    pub url: Option<String>,

    /// Maximum pool size
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

impl DatabaseSettings {
    /// Open a connection pool
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Config`] if no URL is configured and
    /// [`AdminError::Database`] if the connection fails.
    pub async fn connect(&self) -> Result<PgPool, AdminError> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| AdminError::Config("database.url is not set".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect(url)
            .await?;
        tracing::info!(max_connections = self.max_connections, "database pool ready");
        Ok(pool)
    }
}

/// Complete acton-admin configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    /// Service settings
    #[serde(default)]
    pub service: ServiceSettings,

    /// Admin routing settings
    #[serde(default)]
    pub admin: AdminSettings,

    /// Database settings
    #[serde(default)]
    pub database: DatabaseSettings,
}

impl AdminConfig {
    /// Load configuration for a specific service
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be parsed
    /// - Configuration values fail type conversion
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let mut figment = Self::defaults()?;

        let system_config = PathBuf::from("/etc/acton-admin")
            .join(service_name)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let user_config = Self::recommended_path(service_name);
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        let config = figment
            .merge(Env::prefixed("ACTON_").split("__").lowercase(true))
            .extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override values from the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values fail type
    /// conversion.
    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        let config = Self::defaults()?
            .merge(Toml::file(path))
            .merge(Env::prefixed("ACTON_").split("__").lowercase(true))
            .extract()?;
        Ok(config)
    }

    /// Get the recommended XDG config path for a service
    ///
    /// ```rust
    /// use acton_admin::config::AdminConfig;
    ///
    /// let path = AdminConfig::recommended_path("backoffice");
    /// assert!(path.ends_with("config.toml"));
    /// ```
    #[must_use]
    pub fn recommended_path(service_name: &str) -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| {
                config_dir
                    .join("acton-admin")
                    .join(service_name)
                    .join("config.toml")
            },
        )
    }

    fn defaults() -> anyhow::Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }
}
