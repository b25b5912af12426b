//! Read-through TTL cache over the structure builder.
//!
//! The cache holds at most one [`GlobalDocsStructure`]. An entry stays valid
//! while it is younger than the TTL and the store's content version has not
//! moved since it was built.
//!
//! # Thread Safety
//!
//! The lock guards only the entry swap. Rebuilds happen outside the lock, so
//! concurrent misses may rebuild in parallel; the last one to finish wins.
//! Build errors are returned to the caller and never cached.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use docnav_storage::StoreError;

use crate::structure::{GlobalDocsStructure, StructureBuilder};

/// Default time-to-live of a cached structure.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    data: Arc<GlobalDocsStructure>,
    timestamp: Instant,
    version: u64,
}

/// Cached [`GlobalDocsStructure`] with time-based expiry.
pub struct StructureCache {
    builder: StructureBuilder,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<CacheEntry>>,
}

impl StructureCache {
    /// Create an empty cache using the system clock.
    #[must_use]
    pub fn new(builder: StructureBuilder, ttl: Duration) -> Self {
        Self::with_clock(builder, ttl, Arc::new(SystemClock))
    }

    /// Create an empty cache with a custom clock.
    #[must_use]
    pub fn with_clock(builder: StructureBuilder, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            builder,
            ttl,
            clock,
            entry: RwLock::new(None),
        }
    }

    /// Configured time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached structure, rebuilding it if stale.
    pub fn get(&self) -> Result<Arc<GlobalDocsStructure>, StoreError> {
        let version = self.builder.store().version();
        let now = self.clock.now();

        {
            let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entry.as_ref() {
                let age = now.saturating_duration_since(entry.timestamp);
                if age < self.ttl && entry.version == version {
                    tracing::debug!(age_ms = age.as_millis(), "Docs structure cache hit");
                    return Ok(Arc::clone(&entry.data));
                }
                tracing::debug!(
                    age_ms = age.as_millis(),
                    cached_version = entry.version,
                    version,
                    "Docs structure cache stale"
                );
            }
        }

        let data = Arc::new(self.builder.build()?);

        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        *entry = Some(CacheEntry {
            data: Arc::clone(&data),
            timestamp: self.clock.now(),
            version,
        });

        Ok(data)
    }

    /// Drop the cached entry. The next [`get`](Self::get) rebuilds.
    pub fn invalidate(&self) {
        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        if entry.take().is_some() {
            tracing::debug!("Docs structure cache invalidated");
        }
    }

    /// Age of the cached entry, `None` when empty.
    #[must_use]
    pub fn age(&self) -> Option<Duration> {
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        entry
            .as_ref()
            .map(|e| self.clock.now().saturating_duration_since(e.timestamp))
    }
}
