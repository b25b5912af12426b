//! Filesystem content store.
//!
//! Provides [`FsStore`] for reading a documentation corpus from a local
//! directory. Top-level directories are categories, `.md` files are
//! documents, and `index.md` is the landing document of its directory.
//! A directory shadows a sibling document of the same name (`x/` over `x.md`).
//! Ordering and titles come from per-directory YAML sidecars.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::metadata::{DirMetadata, parse_dir_metadata};
use crate::store::{
    Category, ContentStore, Entry, EntryKind, INDEX_NAME, StoreError, StoreErrorKind, UNORDERED,
    join_path, title_from_slug,
};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Document file extension.
const DOC_EXTENSION: &str = "md";

/// Filesystem content store.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use docnav_storage::{ContentStore, FsStore};
///
/// let store = FsStore::new(PathBuf::from("docs"));
/// let entries = store.list_entries("guide")?;
/// ```
pub struct FsStore {
    /// Root directory of the corpus.
    source_dir: PathBuf,
    /// Name of per-directory metadata files.
    meta_filename: String,
    /// Bumped by the watcher on every change.
    generation: Arc<AtomicU64>,
}

/// Keeps a filesystem watcher alive. Watching stops when dropped.
pub struct WatchHandle {
    _watcher: RecommendedWatcher,
}

impl FsStore {
    /// Create a new filesystem store using `meta.yaml` sidecars.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self::with_meta_filename(source_dir, "meta.yaml")
    }

    /// Create a new filesystem store with a custom metadata filename.
    #[must_use]
    pub fn with_meta_filename(source_dir: PathBuf, meta_filename: &str) -> Self {
        Self {
            source_dir,
            meta_filename: meta_filename.to_owned(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Root directory of the corpus.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Start watching the source directory.
    ///
    /// Every create, modify or remove event bumps [`ContentStore::version`],
    /// which invalidates caches keyed on it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the watcher cannot be created or the source
    /// directory cannot be watched.
    pub fn watch(&self) -> Result<WatchHandle, StoreError> {
        let generation = Arc::clone(&self.generation);
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event) if !matches!(event.kind, EventKind::Access(_)) => {
                    generation.fetch_add(1, Ordering::Release);
                    tracing::debug!(paths = ?event.paths, "Content changed");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Watch error"),
            })
            .map_err(|e| {
                StoreError::new(StoreErrorKind::Unavailable)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?;

        watcher
            .watch(&self.source_dir, RecursiveMode::Recursive)
            .map_err(|e| {
                StoreError::new(StoreErrorKind::Unavailable)
                    .with_path(&self.source_dir)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?;

        tracing::info!(dir = %self.source_dir.display(), "Watching for content changes");
        Ok(WatchHandle { _watcher: watcher })
    }

    /// Map a store path to a filesystem path below the source directory.
    ///
    /// Rejects `..`, absolute components, and hidden or underscore-prefixed
    /// segments.
    fn fs_path(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        let valid = relative.components().all(|c| match c {
            Component::Normal(name) => is_visible(&name.to_string_lossy()),
            _ => false,
        });

        if !valid {
            return Err(StoreError::new(StoreErrorKind::InvalidPath)
                .with_path(relative)
                .with_backend(BACKEND));
        }
        Ok(self.source_dir.join(relative))
    }

    /// Path of the document file for a store path.
    ///
    /// Appends the extension instead of replacing it so dotted slugs
    /// (`v1.2`) keep their full name.
    fn doc_file(&self, path: &str) -> Result<PathBuf, StoreError> {
        let mut file = self.fs_path(path)?.into_os_string();
        file.push(".");
        file.push(DOC_EXTENSION);
        Ok(PathBuf::from(file))
    }

    /// Load the metadata sidecar of a directory.
    ///
    /// Missing or malformed metadata yields defaults; malformed files are logged.
    fn read_metadata(&self, dir: &Path) -> DirMetadata {
        let meta_path = dir.join(&self.meta_filename);
        let Ok(content) = fs::read_to_string(&meta_path) else {
            return DirMetadata::default();
        };

        parse_dir_metadata(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %meta_path.display(), error = %e, "Ignoring malformed metadata");
            DirMetadata::default()
        })
    }

    /// Read directory entries, treating a missing directory as empty.
    ///
    /// Symlinks are followed, matching [`ContentStore::kind`].
    fn read_dir(dir: &Path) -> Result<Vec<(String, bool)>, StoreError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND)),
        };

        Ok(entries
            .filter_map(Result::ok)
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                let is_dir = e.path().is_dir();
                is_visible(&name).then_some((name, is_dir))
            })
            .collect())
    }
}

/// Hidden and underscore-prefixed names are not part of the corpus.
fn is_visible(name: &str) -> bool {
    !name.starts_with('.') && !name.starts_with('_')
}

impl ContentStore for FsStore {
    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories: Vec<Category> = Self::read_dir(&self.source_dir)?
            .into_iter()
            .filter(|(_, is_dir)| *is_dir)
            .map(|(id, _)| {
                let meta = self.read_metadata(&self.source_dir.join(&id));
                Category {
                    title: meta.title.unwrap_or_else(|| title_from_slug(&id)),
                    order: meta.order.unwrap_or(UNORDERED),
                    id,
                }
            })
            .collect();

        categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Ok(categories)
    }

    fn list_entries(&self, dir: &str) -> Result<Vec<Entry>, StoreError> {
        let dir_path = self.fs_path(dir)?;
        let listing = Self::read_dir(&dir_path)?;
        let mut found = Vec::new();

        for (name, is_dir) in &listing {
            if *is_dir {
                let meta = self.read_metadata(&dir_path.join(name));
                found.push(Entry::Directory {
                    title: meta.title.unwrap_or_else(|| title_from_slug(name)),
                    slug: name.clone(),
                });
            } else if let Some(stem) = name
                .strip_suffix(DOC_EXTENSION)
                .and_then(|n| n.strip_suffix('.'))
                && stem != INDEX_NAME
            {
                if listing.iter().any(|(n, d)| *d && n == stem) {
                    tracing::debug!(dir = %dir, slug = %stem, "Document shadowed by directory");
                    continue;
                }
                found.push(Entry::Document {
                    title: title_from_slug(stem),
                    slug: stem.to_owned(),
                });
            }
        }

        Ok(self.read_metadata(&dir_path).arrange(found))
    }

    fn kind(&self, path: &str) -> Option<EntryKind> {
        if path.is_empty() {
            return None;
        }
        if self.fs_path(path).ok()?.is_dir() {
            Some(EntryKind::Directory)
        } else if self.doc_file(path).ok()?.is_file() {
            Some(EntryKind::Document)
        } else {
            None
        }
    }

    fn has_index(&self, dir: &str) -> bool {
        self.doc_file(&join_path(dir, INDEX_NAME))
            .is_ok_and(|p| p.is_file())
    }

    fn read(&self, path: &str) -> Result<String, StoreError> {
        let file = self.doc_file(path)?;
        fs::read_to_string(&file).map_err(|e| StoreError::io(e, Some(file)).with_backend(BACKEND))
    }

    fn version(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
