//! Mock content store for testing.
//!
//! Provides [`MockStore`] for unit testing without filesystem access.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::store::{
    Category, ContentStore, Entry, EntryKind, INDEX_NAME, StoreError, StoreErrorKind, join_path,
    title_from_slug,
};

const BACKEND: &str = "Mock";

/// In-memory content store.
///
/// Entries are listed in insertion order. Parent directories are created on
/// demand when documents are added. Listing calls are counted so tests can
/// assert how often the corpus was traversed.
///
/// # Example
///
/// ```ignore
/// use docnav_storage::{ContentStore, MockStore};
///
/// let store = MockStore::new()
///     .with_category("guide", "Guide", 1)
///     .with_index("guide", "# Guide")
///     .with_document("guide/intro", "Intro");
///
/// assert!(store.has_index("guide"));
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    categories: Vec<Category>,
    dirs: HashMap<String, Vec<Entry>>,
    contents: HashMap<String, String>,
    unreadable: HashSet<String>,
    list_calls: AtomicUsize,
    version: AtomicU64,
}

impl MockStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category (a top-level directory).
    #[must_use]
    pub fn with_category(mut self, id: &str, title: &str, order: u32) -> Self {
        self.categories.push(Category {
            id: id.to_owned(),
            title: title.to_owned(),
            order,
        });
        self.categories
            .sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        self.dirs.entry(id.to_owned()).or_default();
        self
    }

    /// Add a directory with an explicit title.
    #[must_use]
    pub fn with_directory(mut self, path: &str, title: &str) -> Self {
        self.ensure_directory(path, Some(title));
        self
    }

    /// Add a document with empty content.
    #[must_use]
    pub fn with_document(self, path: &str, title: &str) -> Self {
        self.with_file(path, title, "")
    }

    /// Add a document with content.
    #[must_use]
    pub fn with_file(mut self, path: &str, title: &str, content: &str) -> Self {
        let (dir, slug) = split(path);
        self.ensure_directory(dir, None);
        self.push_entry(
            dir,
            Entry::Document {
                slug: slug.to_owned(),
                title: title.to_owned(),
            },
        );
        self.contents.insert(path.to_owned(), content.to_owned());
        self
    }

    /// Add an index document to a directory.
    #[must_use]
    pub fn with_index(mut self, dir: &str, content: &str) -> Self {
        self.ensure_directory(dir, None);
        self.contents
            .insert(join_path(dir, INDEX_NAME), content.to_owned());
        self
    }

    /// Add a separator to a directory.
    #[must_use]
    pub fn with_separator(mut self, dir: &str, title: Option<&str>) -> Self {
        self.ensure_directory(dir, None);
        self.push_entry(
            dir,
            Entry::Separator {
                title: title.map(str::to_owned),
            },
        );
        self
    }

    /// Make reads of a document fail with an I/O error.
    #[must_use]
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(path.to_owned());
        self
    }

    /// Number of `list_categories` and `list_entries` calls so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Simulate a content change by bumping the version stamp.
    pub fn bump_version(&self) {
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Create `path` and every missing ancestor, linking each into its parent.
    fn ensure_directory(&mut self, path: &str, title: Option<&str>) {
        if path.is_empty() {
            return;
        }
        if self.dirs.contains_key(path) {
            if let Some(title) = title {
                self.retitle_directory(path, title);
            }
            return;
        }

        let (parent, slug) = split(path);
        self.ensure_directory(parent, None);
        self.dirs.insert(path.to_owned(), Vec::new());
        if !parent.is_empty() {
            self.push_entry(
                parent,
                Entry::Directory {
                    slug: slug.to_owned(),
                    title: title.map_or_else(|| title_from_slug(slug), str::to_owned),
                },
            );
        }
    }

    fn retitle_directory(&mut self, path: &str, new_title: &str) {
        let (parent, slug) = split(path);
        if let Some(entries) = self.dirs.get_mut(parent) {
            for entry in entries {
                if let Entry::Directory { slug: s, title } = entry
                    && *s == slug
                {
                    new_title.clone_into(title);
                }
            }
        }
    }

    fn push_entry(&mut self, dir: &str, entry: Entry) {
        self.dirs.entry(dir.to_owned()).or_default().push(entry);
    }
}

/// Split a store path into parent directory and last segment.
fn split(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}

impl ContentStore for MockStore {
    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.categories.clone())
    }

    fn list_entries(&self, dir: &str) -> Result<Vec<Entry>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.dirs.get(dir).cloned().unwrap_or_default())
    }

    fn kind(&self, path: &str) -> Option<EntryKind> {
        if self.contents.contains_key(path) {
            Some(EntryKind::Document)
        } else if self.dirs.contains_key(path) {
            Some(EntryKind::Directory)
        } else {
            None
        }
    }

    fn has_index(&self, dir: &str) -> bool {
        self.contents.contains_key(&join_path(dir, INDEX_NAME))
    }

    fn read(&self, path: &str) -> Result<String, StoreError> {
        if self.unreadable.contains(path) {
            return Err(StoreError::new(StoreErrorKind::Other)
                .with_path(path)
                .with_backend(BACKEND)
                .with_source(std::io::Error::other("simulated read failure")));
        }
        self.contents.get(path).cloned().ok_or_else(|| {
            StoreError::new(StoreErrorKind::NotFound)
                .with_path(path)
                .with_backend(BACKEND)
        })
    }

    fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_mock_store_is_send_sync() {
        assert_send_sync::<MockStore>();
    }

    #[test]
    fn test_new_empty() {
        let store = MockStore::new();

        assert!(store.list_categories().unwrap().is_empty());
        assert!(store.list_entries("guide").unwrap().is_empty());
    }

    #[test]
    fn test_categories_sorted_by_order() {
        let store = MockStore::new()
            .with_category("api", "API", 2)
            .with_category("guide", "Guide", 1);

        let ids: Vec<_> = store
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();

        assert_eq!(ids, vec!["guide", "api"]);
    }

    #[test]
    fn test_nested_document_creates_parents() {
        let store = MockStore::new()
            .with_category("guide", "Guide", 1)
            .with_document("guide/advanced/tuning", "Tuning");

        assert_eq!(
            store.list_entries("guide").unwrap(),
            vec![Entry::Directory {
                slug: "advanced".to_owned(),
                title: "Advanced".to_owned(),
            }]
        );
        assert_eq!(store.kind("guide/advanced"), Some(EntryKind::Directory));
        assert_eq!(store.kind("guide/advanced/tuning"), Some(EntryKind::Document));
    }

    #[test]
    fn test_with_directory_overrides_title() {
        let store = MockStore::new()
            .with_document("guide/advanced/tuning", "Tuning")
            .with_directory("guide/advanced", "Advanced Topics");

        assert_eq!(
            store.list_entries("guide").unwrap(),
            vec![Entry::Directory {
                slug: "advanced".to_owned(),
                title: "Advanced Topics".to_owned(),
            }]
        );
    }

    #[test]
    fn test_index_is_not_listed() {
        let store = MockStore::new()
            .with_category("guide", "Guide", 1)
            .with_index("guide", "# Guide");

        assert!(store.has_index("guide"));
        assert!(store.list_entries("guide").unwrap().is_empty());
        assert_eq!(store.read("guide/index").unwrap(), "# Guide");
    }

    #[test]
    fn test_read_missing() {
        let store = MockStore::new();

        let err = store.read("missing").unwrap_err();

        assert_eq!(err.kind(), StoreErrorKind::NotFound);
        assert_eq!(err.backend(), Some("Mock"));
    }

    #[test]
    fn test_unreadable() {
        let store = MockStore::new()
            .with_file("guide/broken", "Broken", "content")
            .with_unreadable("guide/broken");

        assert!(store.exists("guide/broken"));
        assert_eq!(
            store.read("guide/broken").unwrap_err().kind(),
            StoreErrorKind::Other
        );
    }

    #[test]
    fn test_list_calls_are_counted() {
        let store = MockStore::new().with_category("guide", "Guide", 1);

        store.list_categories().unwrap();
        store.list_entries("guide").unwrap();
        store.list_entries("missing").unwrap();

        assert_eq!(store.list_calls(), 3);
    }

    #[test]
    fn test_bump_version() {
        let store = MockStore::new();

        store.bump_version();
        store.bump_version();

        assert_eq!(store.version(), 2);
    }
}
