//! Sidebar expand state API endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/sidebar/state.
#[derive(Serialize)]
pub(crate) struct SidebarStateResponse {
    /// Expanded flag per group id.
    expanded: BTreeMap<String, bool>,
}

/// Request body for PUT /api/sidebar/state/{*id}.
#[derive(Deserialize)]
pub(crate) struct SetExpandedRequest {
    expanded: bool,
}

/// Response for PUT /api/sidebar/state/{*id}.
#[derive(Serialize)]
pub(crate) struct GroupStateResponse {
    id: String,
    expanded: bool,
}

/// Handle GET /api/sidebar/state.
///
/// Groups that no longer exist are forgotten first.
pub(crate) async fn get_state(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SidebarStateResponse>, ServerError> {
    let structure = state.docs.structure()?;
    if !structure.is_building() {
        state.expand_state.retain_known(&structure)?;
    }

    Ok(Json(SidebarStateResponse {
        expanded: state.expand_state.snapshot(),
    }))
}

/// Handle PUT /api/sidebar/state/{*id}.
pub(crate) async fn put_state(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetExpandedRequest>,
) -> Result<Json<GroupStateResponse>, ServerError> {
    let id = id.trim_matches('/').to_owned();
    let structure = state.docs.structure()?;
    if !structure.group_ids().contains(id.as_str()) {
        return Err(ServerError::UnknownGroup(id));
    }

    state.expand_state.set(&id, request.expanded)?;
    tracing::debug!(id = %id, expanded = request.expanded, "Sidebar group state changed");

    Ok(Json(GroupStateResponse {
        id,
        expanded: request.expanded,
    }))
}
