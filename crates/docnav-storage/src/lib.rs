//! Content store abstraction for docnav.
//!
//! This crate provides a [`ContentStore`] trait that hides how the documentation
//! corpus is laid out. The navigation core only ever talks to the trait, which
//! enables:
//!
//! - **Unit testing** against an in-memory fixture instead of real files
//! - **Clean separation** between navigation logic and I/O
//!
//! # Architecture
//!
//! - [`ContentStore`] trait with `list_categories()`, `list_entries()`, `kind()`,
//!   `has_index()`, `read()` and `version()`
//! - [`FsStore`] backed by a directory of markdown files and `meta.yaml` sidecars
//! - [`MockStore`] for testing (behind the `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docnav_storage::{ContentStore, FsStore};
//!
//! let store = FsStore::new(PathBuf::from("docs"));
//! for category in store.list_categories()? {
//!     println!("{}: {}", category.id, category.title);
//! }
//! ```

mod fs;
mod metadata;
#[cfg(feature = "mock")]
mod mock;
mod store;

pub use fs::{FsStore, WatchHandle};
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use store::{
    Category, ContentStore, Entry, EntryKind, INDEX_NAME, StoreError, StoreErrorKind, UNORDERED,
    join_path, title_from_slug,
};
