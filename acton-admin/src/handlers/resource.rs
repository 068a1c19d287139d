//! Form and validation handlers for registered resources
//!
//! The validation mode comes from the last path segment, so the handlers only
//! pass the request path and body on to the validation pipeline.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    Json,
};
use serde_json::{Map, Value};

use super::ValidationResponse;
use crate::{
    error::AdminError,
    resource::Resource,
    state::AdminState,
    validation::{validate_request, Mode, ValidationContext},
};

fn find(state: &AdminState, name: &str) -> Result<Arc<Resource>, AdminError> {
    state.registry().get(name).ok_or_else(|| {
        tracing::debug!(resource = %name, "unknown resource requested");
        AdminError::ResourceNotFound(name.to_string())
    })
}

/// Form descriptor for creating a record
///
/// # Errors
///
/// Returns [`AdminError::ResourceNotFound`] for an unregistered resource.
///
/// # Example
///
/// ```bash
/// GET /admin/users/create
/// ```
pub async fn create_form(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AdminError> {
    let resource = find(&state, &name)?;
    Ok(Json(resource.form_descriptor(Mode::Creating)))
}

/// Form descriptor for editing record `id`
///
/// # Errors
///
/// Returns [`AdminError::ResourceNotFound`] for an unregistered resource.
pub async fn edit_form(
    State(state): State<AdminState>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<Value>, AdminError> {
    let resource = find(&state, &name)?;
    let mut descriptor = resource.form_descriptor(Mode::Editing);
    if let Some(object) = descriptor.as_object_mut() {
        object.insert("id".into(), Value::String(id));
    }
    Ok(Json(descriptor))
}

/// Validate a new record
///
/// Responds `200 {"valid": true}` or `422 {"valid": false, "field", "message"}`.
///
/// # Errors
///
/// Returns [`AdminError::ResourceNotFound`] for an unregistered resource and
/// [`AdminError::Lookup`] if a uniqueness lookup fails.
///
/// # Example
///
/// ```bash
/// POST /admin/users/store
/// Content-Type: application/json
///
/// {"email": "ada@example.com"}
/// ```
pub async fn store(
    State(state): State<AdminState>,
    Path(name): Path<String>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Map<String, Value>>,
) -> Result<ValidationResponse, AdminError> {
    check(&state, &name, uri.path(), body).await
}

/// Validate changes to record `id`
///
/// The id in the path is not merged into the body; a unique rule ignoring the
/// current row reads its placeholder from the submitted values.
///
/// # Errors
///
/// Returns [`AdminError::ResourceNotFound`] for an unregistered resource and
/// [`AdminError::Lookup`] if a uniqueness lookup fails.
pub async fn update(
    State(state): State<AdminState>,
    Path((name, id)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Map<String, Value>>,
) -> Result<ValidationResponse, AdminError> {
    tracing::trace!(resource = %name, id = %id, "validating update");
    check(&state, &name, uri.path(), body).await
}

/// Validate a batch of rows
///
/// Rows are checked in order and the first failing row is reported with its
/// zero-based index. A row that is not a JSON object is validated as empty.
///
/// # Errors
///
/// Returns [`AdminError::ResourceNotFound`] for an unregistered resource and
/// [`AdminError::Lookup`] if a uniqueness lookup fails.
pub async fn import(
    State(state): State<AdminState>,
    Path(name): Path<String>,
    OriginalUri(uri): OriginalUri,
    Json(rows): Json<Vec<Value>>,
) -> Result<ValidationResponse, AdminError> {
    let resource = find(&state, &name)?;

    for (index, row) in rows.into_iter().enumerate() {
        let ctx = ValidationContext::from_value(uri.path(), row);
        if let Some(violation) = validate_request(&resource.fields, &ctx, state.lookup()).await? {
            tracing::info!(
                resource = %name,
                row = index,
                field = %violation.field,
                "import row rejected"
            );
            return Ok(ValidationResponse::invalid(violation).at_row(index));
        }
    }

    Ok(ValidationResponse::valid())
}

async fn check(
    state: &AdminState,
    name: &str,
    path: &str,
    body: Map<String, Value>,
) -> Result<ValidationResponse, AdminError> {
    let resource = find(state, name)?;
    let ctx = ValidationContext::new(path, body);
    let violation = validate_request(&resource.fields, &ctx, state.lookup()).await?;

    if let Some(violation) = &violation {
        tracing::info!(
            resource = %name,
            field = %violation.field,
            "submission rejected"
        );
    }
    Ok(violation.into())
}
