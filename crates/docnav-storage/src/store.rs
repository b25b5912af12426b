//! Content store trait and error types.
//!
//! Provides the core [`ContentStore`] trait for enumerating categories and
//! directory entries, along with [`StoreError`] for unified error handling
//! across backends.
//!
//! # Store Path Convention
//!
//! All path parameters are **store paths**, not file paths:
//! - `"guide"` - category directory
//! - `"guide/intro"` - document (maps to `guide/intro.md` on disk)
//! - `"guide/advanced"` - nested directory
//! - `"guide/index"` - the landing document of `guide`
//!
//! Segments are separated by `/` and never carry a file extension.

use std::path::PathBuf;

use serde::Serialize;

/// Name of the landing document inside a directory (without extension).
pub const INDEX_NAME: &str = "index";

/// Order assigned to categories that declare none. Sorts after every declared order.
pub const UNORDERED: u32 = u32::MAX;

/// Top-level grouping of documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Directory name of the category (e.g., "guide").
    pub id: String,
    /// Display title (metadata title, or derived from the id).
    pub title: String,
    /// Declared position among categories.
    pub order: u32,
}

/// One item directly beneath a store directory, in declared order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// A leaf document.
    Document {
        /// Last path segment (e.g., "intro").
        slug: String,
        /// Display title.
        title: String,
    },
    /// A sub-folder that may contain further entries.
    Directory {
        /// Last path segment (e.g., "advanced").
        slug: String,
        /// Display title.
        title: String,
    },
    /// A visual divider declared in metadata.
    Separator {
        /// Optional label.
        title: Option<String>,
    },
}

/// What a store path points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A leaf document.
    Document,
    /// A directory.
    Directory,
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or identifier.
    InvalidPath,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Operation timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    kind: StoreErrorKind,
    path: Option<PathBuf>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    /// Path context, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Backend identifier, if any.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreErrorKind::NotFound).with_path(path)
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StoreErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StoreErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => StoreErrorKind::Timeout,
            _ => StoreErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::PermissionDenied => "Permission denied",
            StoreErrorKind::InvalidPath => "Invalid path",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Timeout => "Timeout",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read access to a documentation corpus.
///
/// Absence is never an error: listing a directory that does not exist returns
/// an empty list, and [`kind`](ContentStore::kind) returns `None`. Errors are
/// reserved for genuine backend failures (permissions, I/O).
pub trait ContentStore: Send + Sync {
    /// List categories ordered by `(order, id)`.
    fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// List entries directly beneath `dir` in declared order.
    ///
    /// The directory's own index document is not listed.
    fn list_entries(&self, dir: &str) -> Result<Vec<Entry>, StoreError>;

    /// Report what `path` points at, `None` if nothing.
    fn kind(&self, path: &str) -> Option<EntryKind>;

    /// Check if anything exists at `path`.
    fn exists(&self, path: &str) -> bool {
        self.kind(path).is_some()
    }

    /// Check if `dir` has an index document directly inside it.
    fn has_index(&self, dir: &str) -> bool;

    /// Read raw document content.
    ///
    /// # Arguments
    ///
    /// * `path` - Store path of a document (e.g., "guide/intro", "guide/index")
    fn read(&self, path: &str) -> Result<String, StoreError>;

    /// Content version stamp.
    ///
    /// Changes whenever the backend notices that content changed. Backends
    /// without change detection return a constant.
    fn version(&self) -> u64 {
        0
    }
}

/// Join a directory store path and a child segment.
#[must_use]
pub fn join_path(dir: &str, slug: &str) -> String {
    if dir.is_empty() {
        slug.to_owned()
    } else {
        format!("{dir}/{slug}")
    }
}

/// Derive a display title from a slug or file stem.
///
/// `getting-started` and `getting_started` both become `Getting Started`.
#[must_use]
pub fn title_from_slug(slug: &str) -> String {
    slug.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_join_path_root() {
        assert_eq!(join_path("", "guide"), "guide");
    }

    #[test]
    fn test_join_path_nested() {
        assert_eq!(join_path("guide/advanced", "tuning"), "guide/advanced/tuning");
    }

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("getting-started"), "Getting Started");
        assert_eq!(title_from_slug("api_reference"), "Api Reference");
        assert_eq!(title_from_slug("faq"), "Faq");
    }

    #[test]
    fn test_store_error_not_found() {
        let err = StoreError::not_found("guide/missing");

        assert_eq!(err.kind(), StoreErrorKind::NotFound);
        assert_eq!(err.path(), Some(Path::new("guide/missing")));
    }

    #[test]
    fn test_store_error_io_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = StoreError::io(io_err, None);

        assert_eq!(err.kind(), StoreErrorKind::PermissionDenied);
        assert!(err.path().is_none());
    }

    #[test]
    fn test_store_error_io_timeout() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = StoreError::io(io_err, Some(PathBuf::from("guide.md")));

        assert_eq!(err.kind(), StoreErrorKind::Timeout);
        assert_eq!(err.path(), Some(Path::new("guide.md")));
    }

    #[test]
    fn test_store_error_display_simple() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn test_store_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StoreError::new(StoreErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("guide/intro.md")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: guide/intro.md)"
        );
    }

    #[test]
    fn test_store_error_source_is_exposed() {
        let io_err = std::io::Error::other("boom");
        let err = StoreError::new(StoreErrorKind::Other).with_source(io_err);

        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_store_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
