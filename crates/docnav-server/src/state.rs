//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use docnav_site::{Docs, ExpandState};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Document navigation over the content store.
    pub(crate) docs: Arc<Docs>,
    /// Sidebar expand state.
    pub(crate) expand_state: ExpandState,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
}
