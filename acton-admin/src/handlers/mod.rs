//! HTTP handlers for admin resources
//!
//! [`router`] mounts every route under `admin.route_prefix`:
//!
//! | method | path                      | handler                        |
//! |--------|---------------------------|--------------------------------|
//! | GET    | `/{resource}/create`      | [`resource::create_form`]      |
//! | GET    | `/{resource}/{id}/edit`   | [`resource::edit_form`]        |
//! | POST   | `/{resource}/store`       | [`resource::store`]            |
//! | PUT    | `/{resource}/{id}/update` | [`resource::update`]           |
//! | POST   | `/{resource}/import`      | [`resource::import`]           |
//!
//! # Example
//!
//! ```rust,no_run
//! use acton_admin::handlers::router;
//! use acton_admin::resource::ResourceRegistry;
//! use acton_admin::state::AdminState;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let state = AdminState::in_memory(ResourceRegistry::new());
//! let listener = tokio::net::TcpListener::bind(&state.config().service.listen_addr).await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

pub mod resource;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::{state::AdminState, validation::Violation};

/// Build the admin router
#[must_use]
pub fn router(state: AdminState) -> Router {
    let prefix = state.config().admin.route_prefix.clone();
    let routes = Router::new()
        .route("/{resource}/create", get(resource::create_form))
        .route("/{resource}/{id}/edit", get(resource::edit_form))
        .route("/{resource}/store", post(resource::store))
        .route("/{resource}/{id}/update", put(resource::update))
        .route("/{resource}/import", post(resource::import));

    let app = if prefix.is_empty() || prefix == "/" {
        routes
    } else {
        Router::new().nest(&prefix, routes)
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Outcome of validating a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResponse {
    /// Whether every rule passed
    pub valid: bool,

    /// Import row that failed (zero based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,

    /// Field of the failing rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Message of the failing rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResponse {
    /// A passing submission
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            valid: true,
            row: None,
            field: None,
            message: None,
        }
    }

    /// A failing submission
    #[must_use]
    pub fn invalid(violation: Violation) -> Self {
        Self {
            valid: false,
            row: None,
            field: Some(violation.field),
            message: Some(violation.message),
        }
    }

    /// Attach the failing import row
    #[must_use]
    pub const fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

impl From<Option<Violation>> for ValidationResponse {
    fn from(violation: Option<Violation>) -> Self {
        violation.map_or_else(Self::valid, Self::invalid)
    }
}

impl IntoResponse for ValidationResponse {
    fn into_response(self) -> Response {
        let status = if self.valid {
            StatusCode::OK
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };
        (status, Json(self)).into_response()
    }
}
