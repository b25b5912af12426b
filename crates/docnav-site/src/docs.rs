//! Navigation facade.
//!
//! [`Docs`] ties one content store to the structure cache and the resolver,
//! and follows redirects on behalf of callers.
//!
//! # Thread Safety
//!
//! `Docs` is `Send + Sync` and meant to be shared behind an `Arc`. Every
//! method takes `&self`; the structure cache is the only shared mutable state.

use std::sync::Arc;
use std::time::Duration;

use docnav_storage::ContentStore;

use crate::error::DocsError;
use crate::redirect::RedirectChain;
use crate::resolver::{DocPathResolution, Resolver};
use crate::routes::{DEFAULT_PREFIX, DocRoutes};
use crate::structure::{GlobalDocsStructure, StructureBuilder};
use crate::structure_cache::{Clock, DEFAULT_TTL, StructureCache, SystemClock};

/// Configuration for [`Docs`].
#[derive(Clone, Debug)]
pub struct DocsConfig {
    /// Route prefix of document hrefs (e.g., "/docs").
    pub route_prefix: String,
    /// Time-to-live of the cached structure.
    pub cache_ttl: Duration,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            route_prefix: DEFAULT_PREFIX.to_owned(),
            cache_ttl: DEFAULT_TTL,
        }
    }
}

/// A resolved document with its raw content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocPage {
    /// Canonical href.
    pub href: String,
    /// Store path of the source document.
    pub source: String,
    /// Whether the source is a directory index.
    pub is_index: bool,
    /// Raw document content.
    pub content: String,
}

/// Result of [`Docs::open`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Opened {
    /// The requested path is a document.
    Page(DocPage),
    /// The requested path should be served from `to`, the end of the
    /// redirect chain.
    Redirect {
        /// Final redirect target.
        to: String,
    },
}

/// Documentation navigation over a content store.
pub struct Docs {
    store: Arc<dyn ContentStore>,
    routes: DocRoutes,
    cache: Arc<StructureCache>,
    resolver: Resolver,
}

impl Docs {
    /// Create a navigator using the system clock.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, config: DocsConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Create a navigator with a custom clock for the structure cache.
    #[must_use]
    pub fn with_clock(
        store: Arc<dyn ContentStore>,
        config: DocsConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let routes = DocRoutes::new(&config.route_prefix);
        let builder = StructureBuilder::new(Arc::clone(&store), routes.clone());
        let cache = Arc::new(StructureCache::with_clock(builder, config.cache_ttl, clock));
        let resolver = Resolver::new(Arc::clone(&store), routes.clone(), Arc::clone(&cache));
        Self {
            store,
            routes,
            cache,
            resolver,
        }
    }

    /// Route mapping.
    #[must_use]
    pub fn routes(&self) -> &DocRoutes {
        &self.routes
    }

    /// Content version stamp of the underlying store.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.store.version()
    }

    /// Cached navigation structure.
    pub fn structure(&self) -> Result<Arc<GlobalDocsStructure>, DocsError> {
        self.cache.get().map_err(|source| DocsError::Store {
            path: self.routes.root().to_owned(),
            source,
        })
    }

    /// Resolve slug segments without following redirects.
    pub fn resolve<S: AsRef<str>>(&self, slug: &[S]) -> Result<DocPathResolution, DocsError> {
        self.resolver.resolve(slug).map_err(|source| DocsError::Store {
            path: self.href_of(slug),
            source,
        })
    }

    /// Open the document at `slug`, following redirects.
    ///
    /// Returns [`Opened::Redirect`] with the final target if any redirect was
    /// followed, so callers can send the reader to the canonical href.
    pub fn open<S: AsRef<str>>(&self, slug: &[S]) -> Result<Opened, DocsError> {
        let requested = self.href_of(slug);

        if self.structure()?.is_building() {
            return Err(DocsError::Building { path: requested });
        }

        let mut chain = RedirectChain::new(&requested);
        let mut resolution = self.resolve(slug)?;

        loop {
            match resolution {
                DocPathResolution::Document {
                    href,
                    source,
                    is_index,
                } => {
                    if chain.hops() > 0 {
                        return Ok(Opened::Redirect { to: href });
                    }
                    let content = self.store.read(&source).map_err(|err| {
                        tracing::error!(
                            path = %requested,
                            source = %source,
                            error = %err,
                            "Failed to read document"
                        );
                        DocsError::ContentError {
                            path: requested.clone(),
                            source: err,
                        }
                    })?;
                    return Ok(Opened::Page(DocPage {
                        href,
                        source,
                        is_index,
                        content,
                    }));
                }
                DocPathResolution::Redirect { redirect_to } => {
                    chain.follow(&redirect_to)?;
                    let Some(segments) = self.routes.segments(&redirect_to) else {
                        return Err(DocsError::NotFound { path: requested });
                    };
                    resolution = self.resolve(&segments)?;
                }
                DocPathResolution::NotFound => {
                    return Err(DocsError::NotFound { path: requested });
                }
            }
        }
    }

    /// Drop the cached structure so the next request rebuilds it.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    fn href_of<S: AsRef<str>>(&self, slug: &[S]) -> String {
        let path: Vec<&str> = slug.iter().map(AsRef::as_ref).collect();
        self.routes.href(&path.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use docnav_storage::{Category, Entry, EntryKind, FsStore, MockStore, StoreError};
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(Docs: Send, Sync);

    fn docs(store: MockStore) -> Docs {
        Docs::new(Arc::new(store), DocsConfig::default())
    }

    fn guide_and_api() -> Docs {
        docs(
            MockStore::new()
                .with_category("guide", "Guide", 1)
                .with_index("guide", "# Guide")
                .with_file("guide/setup", "Setup", "# Setup")
                .with_category("api", "API", 2)
                .with_file("api/intro", "Intro", "# Intro"),
        )
    }

    #[test]
    fn test_open_category_index() {
        let docs = guide_and_api();

        let opened = docs.open(&["guide"]).unwrap();

        assert_eq!(
            opened,
            Opened::Page(DocPage {
                href: "/docs/guide".to_owned(),
                source: "guide/index".to_owned(),
                is_index: true,
                content: "# Guide".to_owned(),
            })
        );
    }

    #[test]
    fn test_open_leaf() {
        let docs = guide_and_api();

        let Opened::Page(page) = docs.open(&["api", "intro"]).unwrap() else {
            panic!("expected page");
        };

        assert_eq!(page.content, "# Intro");
        assert!(!page.is_index);
    }

    #[test]
    fn test_open_category_without_index_redirects() {
        let docs = guide_and_api();

        assert_eq!(
            docs.open(&["api"]).unwrap(),
            Opened::Redirect {
                to: "/docs/api/intro".to_owned()
            }
        );
    }

    #[test]
    fn test_open_root_follows_to_final_target() {
        let docs = docs(
            MockStore::new()
                .with_category("api", "API", 1)
                .with_file("api/intro", "Intro", "# Intro"),
        );

        let empty: [&str; 0] = [];

        assert_eq!(
            docs.open(&empty).unwrap(),
            Opened::Redirect {
                to: "/docs/api/intro".to_owned()
            }
        );
    }

    #[test]
    fn test_open_missing_is_not_found() {
        let docs = guide_and_api();

        let err = docs.open(&["guide", "missing"]).unwrap_err();

        assert_eq!(err.kind(), "not-found");
        assert_eq!(err.path(), "/docs/guide/missing");
    }

    #[test]
    fn test_open_empty_store_is_building() {
        let docs = docs(MockStore::new());

        let err = docs.open(&["guide"]).unwrap_err();

        assert!(matches!(err, DocsError::Building { ref path } if path == "/docs/guide"));
    }

    #[test]
    fn test_open_root_on_empty_store_is_building() {
        let docs = docs(MockStore::new());

        let err = docs.open(&[] as &[&str]).unwrap_err();

        assert!(matches!(err, DocsError::Building { ref path } if path == "/docs"));
    }

    #[test]
    fn test_open_unreadable_is_content_error() {
        let docs = docs(
            MockStore::new()
                .with_category("guide", "Guide", 1)
                .with_file("guide/broken", "Broken", "x")
                .with_unreadable("guide/broken"),
        );

        let err = docs.open(&["guide", "broken"]).unwrap_err();

        assert_eq!(err.kind(), "content-error");
        assert_eq!(err.path(), "/docs/guide/broken");
    }

    #[test]
    fn test_open_redirect_loop() {
        // Lists `a/index` as a plain document but reports no index for `a`.
        struct LoopStore;

        impl ContentStore for LoopStore {
            fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
                Ok(vec![Category {
                    id: "a".to_owned(),
                    title: "A".to_owned(),
                    order: 1,
                }])
            }

            fn list_entries(&self, dir: &str) -> Result<Vec<Entry>, StoreError> {
                Ok(if dir == "a" {
                    vec![Entry::Document {
                        slug: "index".to_owned(),
                        title: "Index".to_owned(),
                    }]
                } else {
                    vec![]
                })
            }

            fn kind(&self, path: &str) -> Option<EntryKind> {
                match path {
                    "a" => Some(EntryKind::Directory),
                    "a/index" => Some(EntryKind::Document),
                    _ => None,
                }
            }

            fn has_index(&self, _dir: &str) -> bool {
                false
            }

            fn read(&self, path: &str) -> Result<String, StoreError> {
                Err(StoreError::not_found(path))
            }
        }

        let docs = Docs::new(Arc::new(LoopStore), DocsConfig::default());

        let err = docs.open(&["a"]).unwrap_err();

        assert!(matches!(
            err,
            DocsError::RedirectLoop { ref path, ref target }
                if path == "/docs/a" && target == "/docs/a"
        ));
    }

    #[test]
    fn test_custom_prefix() {
        let store = MockStore::new()
            .with_category("guide", "Guide", 1)
            .with_file("guide/intro", "Intro", "# Intro");
        let docs = Docs::new(
            Arc::new(store),
            DocsConfig {
                route_prefix: "/handbook".to_owned(),
                ..Default::default()
            },
        );

        assert_eq!(docs.structure().unwrap().first_doc_path, "/handbook/guide/intro");
        assert_eq!(
            docs.open(&["guide"]).unwrap(),
            Opened::Redirect {
                to: "/handbook/guide/intro".to_owned()
            }
        );
    }

    #[test]
    fn test_invalidate_picks_up_changes() {
        let store = Arc::new(
            MockStore::new()
                .with_category("guide", "Guide", 1)
                .with_document("guide/intro", "Intro"),
        );
        let docs = Docs::new(
            Arc::clone(&store) as Arc<dyn ContentStore>,
            DocsConfig::default(),
        );

        docs.structure().unwrap();
        let calls = store.list_calls();
        docs.invalidate();
        docs.structure().unwrap();

        assert_eq!(store.list_calls(), calls * 2);
    }

    #[test]
    fn test_open_category_follows_store_changes_within_ttl() {
        let temp = tempfile::tempdir().unwrap();
        let api = temp.path().join("api");
        std::fs::create_dir(&api).unwrap();
        std::fs::write(api.join("index.md"), "# API").unwrap();
        std::fs::write(api.join("intro.md"), "# Intro").unwrap();
        std::fs::write(api.join("other.md"), "# Other").unwrap();
        let docs = Docs::new(
            Arc::new(FsStore::new(temp.path().to_path_buf())),
            DocsConfig::default(),
        );

        let Opened::Page(page) = docs.open(&["api"]).unwrap() else {
            panic!("expected category index");
        };
        assert_eq!(page.source, "api/index");

        std::fs::remove_file(api.join("index.md")).unwrap();
        assert_eq!(
            docs.open(&["api"]).unwrap(),
            Opened::Redirect {
                to: "/docs/api/intro".to_owned()
            }
        );

        std::fs::remove_file(api.join("intro.md")).unwrap();
        assert_eq!(
            docs.open(&["api"]).unwrap(),
            Opened::Redirect {
                to: "/docs/api/other".to_owned()
            }
        );
    }
}
