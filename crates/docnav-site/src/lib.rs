//! Document resolution and navigation structure for docnav.
//!
//! This crate provides:
//! - [`Docs`]: facade tying the pieces below to one content store
//! - [`Resolver`]: slug to document, redirect, or not-found
//! - [`RedirectChain`] and [`is_redirect_loop`]: redirect loop detection
//! - [`StructureBuilder`]: aggregated sidebar structure for every category
//! - [`StructureCache`]: read-through TTL cache over the builder
//! - [`ExpandState`]: persisted expand/collapse state of sidebar groups
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use docnav_site::{Docs, DocsConfig, Opened};
//! use docnav_storage::FsStore;
//!
//! let store = Arc::new(FsStore::new(PathBuf::from("docs")));
//! let docs = Docs::new(store, DocsConfig::default());
//!
//! // Sidebar structure (cached)
//! let structure = docs.structure()?;
//!
//! // Open a page
//! match docs.open(&["guide", "intro"])? {
//!     Opened::Page(page) => { let _ = page.content; }
//!     Opened::Redirect { to } => { let _ = to; }
//! }
//! # Ok(())
//! # }
//! ```

mod docs;
mod error;
mod expand_state;
mod redirect;
mod resolver;
mod routes;
mod structure;
mod structure_cache;
mod tree;

pub use docs::{DocPage, Docs, DocsConfig, Opened};
pub use error::DocsError;
pub use expand_state::{
    ExpandState, ExpandStateError, ExpandStateStore, FileExpandStore, MemoryExpandStore,
};
pub use redirect::{MAX_REDIRECTS, RedirectChain, is_redirect_loop};
pub use resolver::{DocPathResolution, Resolver};
pub use routes::{DEFAULT_PREFIX, DocRoutes};
pub use structure::{CategoryWithDocs, GlobalDocsStructure, StructureBuilder};
pub use structure_cache::{Clock, DEFAULT_TTL, StructureCache, SystemClock};
pub use tree::{
    SidebarItem, category_docs, category_has_index, count_documents, directory_items, first_leaf,
};
