//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use docnav_site::{DocsError, ExpandStateError};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Navigation failed.
    #[error(transparent)]
    Docs(#[from] DocsError),

    /// Sidebar group does not exist.
    #[error("Unknown sidebar group: {0}")]
    UnknownGroup(String),

    /// Expand state could not be persisted.
    #[error("Failed to save sidebar state: {0}")]
    ExpandState(#[from] ExpandStateError),
}

/// HTTP status for a navigation error.
fn docs_status(err: &DocsError) -> StatusCode {
    match err {
        DocsError::NotFound { .. } => StatusCode::NOT_FOUND,
        DocsError::Building { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DocsError::RedirectLoop { .. } => StatusCode::LOOP_DETECTED,
        DocsError::ContentError { .. } | DocsError::Store { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Docs(e) => {
                let status = docs_status(e);
                if status.is_server_error() {
                    tracing::error!(
                        path = %e.path(),
                        kind = e.kind(),
                        error = %e,
                        "Request failed"
                    );
                }
                (
                    status,
                    json!({"error": e.kind(), "message": e.user_message(), "path": e.path()}),
                )
            }
            Self::UnknownGroup(id) => (
                StatusCode::NOT_FOUND,
                json!({"error": "not-found", "message": "Unknown sidebar group.", "path": id}),
            ),
            Self::ExpandState(e) => {
                tracing::error!(error = %e, "Failed to save sidebar state");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "state-error", "message": "Sidebar state could not be saved."}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use docnav_storage::{StoreError, StoreErrorKind};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_docs_status() {
        let cases = [
            (DocsError::NotFound { path: "/docs/x".to_owned() }, 404),
            (DocsError::Building { path: "/docs".to_owned() }, 503),
            (
                DocsError::RedirectLoop {
                    path: "/docs/a".to_owned(),
                    target: "/docs/a".to_owned(),
                },
                508,
            ),
            (
                DocsError::ContentError {
                    path: "/docs/a".to_owned(),
                    source: StoreError::new(StoreErrorKind::Other),
                },
                500,
            ),
            (
                DocsError::Store {
                    path: "/docs".to_owned(),
                    source: StoreError::new(StoreErrorKind::PermissionDenied),
                },
                500,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(docs_status(&err).as_u16(), status, "{}", err.kind());
        }
    }

    #[test]
    fn test_unknown_group_is_not_found() {
        let response = ServerError::UnknownGroup("guide/ghost".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
