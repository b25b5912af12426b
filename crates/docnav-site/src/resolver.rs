//! Slug resolution.
//!
//! Turns the path segments of a request into exactly one of: a document to
//! render, a redirect, or not-found. Resolution order:
//!
//! 1. Empty slug: redirect to the global first document.
//! 2. Leaf document at the joined path: the document. A trailing `index`
//!    segment naming an index document redirects to its directory.
//! 3. Single segment naming a category: the category's index, else a redirect
//!    to its first leaf, read from the live store.
//! 4. Directory with an index: the index, flagged `is_index`.
//! 5. Directory without an index: redirect to its first leaf.
//! 6. Anything else: not found.

use std::sync::Arc;

use docnav_storage::{ContentStore, EntryKind, INDEX_NAME, StoreError, join_path};
use serde::Serialize;

use crate::routes::DocRoutes;
use crate::structure_cache::StructureCache;
use crate::tree::{category_docs, category_has_index, directory_items, first_leaf};

/// Outcome of resolving a slug.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DocPathResolution {
    /// A document to render.
    Document {
        /// Canonical href of the document.
        href: String,
        /// Store path of the source document.
        source: String,
        /// Whether the source is a directory index.
        is_index: bool,
    },
    /// The slug should be served from another href.
    Redirect {
        /// Target href.
        redirect_to: String,
    },
    /// Nothing matches.
    NotFound,
}

/// Intermediate result of the lookup step.
enum Step {
    Resolved(DocPathResolution),
    Category(String),
}

/// Resolves slugs against a content store.
pub struct Resolver {
    store: Arc<dyn ContentStore>,
    routes: DocRoutes,
    cache: Arc<StructureCache>,
}

impl Resolver {
    /// Create a resolver. The cache provides the global first document.
    #[must_use]
    pub fn new(
        store: Arc<dyn ContentStore>,
        routes: DocRoutes,
        cache: Arc<StructureCache>,
    ) -> Self {
        Self {
            store,
            routes,
            cache,
        }
    }

    /// Resolve slug segments (e.g., `["guide", "intro"]`).
    pub fn resolve<S: AsRef<str>>(&self, slug: &[S]) -> Result<DocPathResolution, StoreError> {
        let segments: Vec<&str> = slug.iter().map(AsRef::as_ref).collect();
        match self.step(&segments)? {
            Step::Resolved(resolution) => Ok(resolution),
            Step::Category(id) => self.resolve_category(&id),
        }
    }

    fn step(&self, segments: &[&str]) -> Result<Step, StoreError> {
        if segments.is_empty() {
            let structure = self.cache.get()?;
            return Ok(Step::Resolved(DocPathResolution::Redirect {
                redirect_to: structure.first_doc_path.clone(),
            }));
        }
        if segments
            .iter()
            .any(|s| s.is_empty() || *s == "." || *s == "..")
        {
            return Ok(Step::Resolved(DocPathResolution::NotFound));
        }

        let path = segments.join("/");
        let resolution = match self.store.kind(&path) {
            Some(EntryKind::Document) => self.resolve_document(segments, path),
            Some(EntryKind::Directory) if segments.len() == 1 => return Ok(Step::Category(path)),
            Some(EntryKind::Directory) => self.resolve_directory(&path)?,
            None => DocPathResolution::NotFound,
        };
        Ok(Step::Resolved(resolution))
    }

    fn resolve_document(&self, segments: &[&str], path: String) -> DocPathResolution {
        if let Some((last, parent)) = segments.split_last()
            && *last == INDEX_NAME
        {
            return DocPathResolution::Redirect {
                redirect_to: self.routes.href(&parent.join("/")),
            };
        }
        DocPathResolution::Document {
            href: self.routes.href(&path),
            source: path,
            is_index: false,
        }
    }

    /// Resolve a category from the live store; the cached structure may be stale.
    fn resolve_category(&self, id: &str) -> Result<DocPathResolution, StoreError> {
        if category_has_index(self.store.as_ref(), id) {
            return Ok(self.index_document(id));
        }
        let docs = category_docs(self.store.as_ref(), &self.routes, id)?;
        Ok(match first_leaf(&docs) {
            Some(first) => DocPathResolution::Redirect {
                redirect_to: first.to_owned(),
            },
            None => DocPathResolution::NotFound,
        })
    }

    fn resolve_directory(&self, path: &str) -> Result<DocPathResolution, StoreError> {
        if self.store.has_index(path) {
            return Ok(self.index_document(path));
        }
        let items = directory_items(self.store.as_ref(), &self.routes, path)?;
        Ok(match first_leaf(&items) {
            Some(first) => DocPathResolution::Redirect {
                redirect_to: first.to_owned(),
            },
            None => DocPathResolution::NotFound,
        })
    }

    fn index_document(&self, dir: &str) -> DocPathResolution {
        DocPathResolution::Document {
            href: self.routes.href(dir),
            source: join_path(dir, INDEX_NAME),
            is_index: true,
        }
    }
}
