//! Global structure API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use docnav_site::GlobalDocsStructure;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/docs/global-structure.
pub(crate) async fn get_global_structure(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let structure = state.docs.structure()?;

    Ok((
        [(header::CACHE_CONTROL, "private, max-age=60")],
        Json(GlobalDocsStructure::clone(&structure)),
    ))
}
