//! Navigation errors.

use docnav_storage::StoreError;

/// Error returned when a document cannot be served.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    /// Nothing exists at the requested path.
    #[error("Document not found: {path}")]
    NotFound {
        /// Requested href.
        path: String,
    },
    /// The corpus has no navigable documents yet.
    #[error("Documentation is not available yet: {path}")]
    Building {
        /// Requested href.
        path: String,
    },
    /// Following redirects would revisit a path.
    #[error("Redirect loop: {path} -> {target}")]
    RedirectLoop {
        /// Requested href.
        path: String,
        /// Redirect target that closed the loop.
        target: String,
    },
    /// The resolved document could not be read.
    #[error("Failed to read {path}: {source}")]
    ContentError {
        /// Requested href.
        path: String,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
    /// The store failed while resolving or building the structure.
    #[error("Storage error at {path}: {source}")]
    Store {
        /// Requested href.
        path: String,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
}

impl DocsError {
    /// Stable machine-readable error code.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not-found",
            Self::Building { .. } => "building",
            Self::RedirectLoop { .. } => "redirect-loop",
            Self::ContentError { .. } => "content-error",
            Self::Store { .. } => "storage-error",
        }
    }

    /// Message suitable for display to readers.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "The requested document does not exist.",
            Self::Building { .. } => {
                "Documentation is being prepared. Please try again in a moment."
            }
            Self::RedirectLoop { .. } => "This page redirects to itself and cannot be shown.",
            Self::ContentError { .. } => "The document could not be loaded.",
            Self::Store { .. } => "Documentation storage is unavailable.",
        }
    }

    /// Requested href.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path }
            | Self::Building { path }
            | Self::RedirectLoop { path, .. }
            | Self::ContentError { path, .. }
            | Self::Store { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use docnav_storage::StoreErrorKind;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_kinds() {
        let store_err = || StoreError::new(StoreErrorKind::Other);
        let cases = [
            (DocsError::NotFound { path: "/docs/x".to_owned() }, "not-found"),
            (DocsError::Building { path: "/docs".to_owned() }, "building"),
            (
                DocsError::RedirectLoop {
                    path: "/docs/a".to_owned(),
                    target: "/docs/a".to_owned(),
                },
                "redirect-loop",
            ),
            (
                DocsError::ContentError {
                    path: "/docs/a".to_owned(),
                    source: store_err(),
                },
                "content-error",
            ),
            (
                DocsError::Store {
                    path: "/docs".to_owned(),
                    source: store_err(),
                },
                "storage-error",
            ),
        ];

        for (err, kind) in cases {
            assert_eq!(err.kind(), kind);
            assert!(!err.user_message().is_empty());
        }
    }

    #[test]
    fn test_path() {
        let err = DocsError::RedirectLoop {
            path: "/docs/a".to_owned(),
            target: "/docs/b".to_owned(),
        };

        assert_eq!(err.path(), "/docs/a");
        assert_eq!(err.to_string(), "Redirect loop: /docs/a -> /docs/b");
    }

    #[test]
    fn test_content_error_exposes_source() {
        let err = DocsError::ContentError {
            path: "/docs/a".to_owned(),
            source: StoreError::not_found("a"),
        };

        assert!(std::error::Error::source(&err).is_some());
    }
}
