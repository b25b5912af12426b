//! Redirect loop detection.

use crate::error::DocsError;

/// Maximum number of redirects followed for one request.
pub const MAX_REDIRECTS: usize = 16;

/// Check whether redirecting from `current` to `target` revisits `current`.
///
/// Paths are compared after trimming trailing slashes, so `/docs/a/` and
/// `/docs/a` are the same path.
#[must_use]
pub fn is_redirect_loop(current: &str, target: &str) -> bool {
    normalize(current) == normalize(target)
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Paths visited while following redirects for one request.
///
/// Starts at the requested path. Every hop is checked against all visited
/// paths, so `a -> b -> a` is caught as well as `a -> a`. Chains of distinct
/// paths are fine up to [`MAX_REDIRECTS`] hops.
#[derive(Clone, Debug)]
pub struct RedirectChain {
    visited: Vec<String>,
}

impl RedirectChain {
    /// Start a chain at the requested path.
    #[must_use]
    pub fn new(origin: &str) -> Self {
        Self {
            visited: vec![normalize(origin).to_owned()],
        }
    }

    /// Record a redirect to `target`.
    ///
    /// Fails with [`DocsError::RedirectLoop`] if `target` was already visited
    /// or the hop limit is exceeded.
    pub fn follow(&mut self, target: &str) -> Result<(), DocsError> {
        let looped = self.visited.iter().any(|v| is_redirect_loop(v, target));
        if looped || self.hops() >= MAX_REDIRECTS {
            tracing::warn!(
                path = %self.origin(),
                target = %target,
                hops = self.hops(),
                "Redirect loop detected"
            );
            return Err(DocsError::RedirectLoop {
                path: self.origin().to_owned(),
                target: target.to_owned(),
            });
        }
        self.visited.push(normalize(target).to_owned());
        Ok(())
    }

    /// Requested path.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.visited[0]
    }

    /// Last path reached.
    #[must_use]
    pub fn current(&self) -> &str {
        self.visited.last().map_or("/", String::as_str)
    }

    /// Number of redirects followed.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.visited.len() - 1
    }
}
