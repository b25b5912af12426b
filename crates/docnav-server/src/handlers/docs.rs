//! Document API endpoint.
//!
//! Resolves a slug and returns the raw document, a redirect to the
//! canonical href, or an error. Redirect `Location` headers point back into
//! this API so following clients land on the target document; the body keeps
//! the reader-facing href.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use docnav_site::Opened;
use md5::{Digest, Md5};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for a resolved document.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocResponse {
    /// Canonical href.
    path: String,
    /// Store path of the source document.
    source: String,
    /// Whether the source is a directory index.
    is_index: bool,
    /// Raw document content.
    content: String,
}

/// Mount point of the document API.
const DOCS_API_PREFIX: &str = "/api/docs/";

/// Response body of a redirect.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RedirectResponse {
    redirect_to: String,
}

/// Handle GET /api/docs/ (root).
pub(crate) async fn get_root_doc(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_doc_impl("", &state, &headers)
}

/// Handle GET /api/docs/{*slug}.
pub(crate) async fn get_doc(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_doc_impl(&slug, &state, &headers)
}

fn get_doc_impl(
    slug: &str,
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let segments = split_slug(slug);

    let page = match state.docs.open(&segments)? {
        Opened::Page(page) => page,
        Opened::Redirect { to } => {
            tracing::debug!(slug = %slug, to = %to, "Redirecting");
            let location = api_location(&state.docs.routes().segments(&to).unwrap_or_default());
            return Ok((
                StatusCode::TEMPORARY_REDIRECT,
                [(header::LOCATION, location)],
                Json(RedirectResponse { redirect_to: to }),
            )
                .into_response());
        }
    };

    let etag = compute_etag(&state.version, &page.content);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let response = DocResponse {
        path: page.href,
        source: page.source,
        is_index: page.is_index,
        content: page.content,
    };

    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Json(response),
    )
        .into_response())
}

/// Split a wildcard capture into slug segments. A trailing slash is ignored.
fn split_slug(slug: &str) -> Vec<&str> {
    let trimmed = slug.trim_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// API route serving the document at `segments`.
fn api_location(segments: &[&str]) -> String {
    format!("{DOCS_API_PREFIX}{}", segments.join("/"))
}

/// Compute `ETag` from version and content.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
