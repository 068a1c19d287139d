//! Error types and error handling
//!
//! Validation failures are not errors: they are returned as
//! [`Violation`](crate::validation::Violation) data. [`AdminError`] covers
//! everything that is the operator's problem rather than the end user's.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::lookup::LookupError;

/// Framework error type
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No resource registered under the requested name
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// A rule could not be built from its definition (e.g. a bad pattern)
    #[error("Invalid {rule} rule `{definition}`: {reason}")]
    InvalidRule {
        /// Rule kind, e.g. `regexp`
        rule: &'static str,
        /// The offending definition as written
        definition: String,
        /// What was wrong with it
        reason: String,
    },

    /// The uniqueness lookup failed; usually a rule naming a missing table or column
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            Self::ResourceNotFound(name) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("Unknown resource: {name}") })),
            )
                .into_response(),
            other => {
                tracing::error!(error = %other, "admin request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
