//! Mapping between store paths and public hrefs.

/// Default route prefix under which documents are served.
pub const DEFAULT_PREFIX: &str = "/docs";

/// Builds hrefs from store paths and back.
///
/// An href is the route prefix followed by the store path segments:
/// store path `guide/intro` becomes `/docs/guide/intro`. The prefix alone is
/// the root href, used as the fallback when no document exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocRoutes {
    prefix: String,
}

impl Default for DocRoutes {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl DocRoutes {
    /// Create routes under `prefix`. Trailing slashes are dropped.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim_end_matches('/');
        let prefix = if trimmed.starts_with('/') {
            trimmed.to_owned()
        } else {
            format!("/{trimmed}")
        };
        Self { prefix }
    }

    /// Root href (the prefix itself).
    #[must_use]
    pub fn root(&self) -> &str {
        &self.prefix
    }

    /// Href of a store path. The empty path maps to the root.
    #[must_use]
    pub fn href(&self, store_path: &str) -> String {
        if store_path.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}/{store_path}", self.prefix)
        }
    }

    /// Split an href into store path segments.
    ///
    /// Returns `None` when the href lies outside the prefix.
    #[must_use]
    pub fn segments<'a>(&self, href: &'a str) -> Option<Vec<&'a str>> {
        let rest = href.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() {
            return Some(Vec::new());
        }
        let rest = rest.strip_prefix('/')?;
        Some(
            rest.split('/')
                .filter(|segment| !segment.is_empty())
                .collect(),
        )
    }
}
