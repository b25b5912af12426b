//! Sidebar trees read from the content store.
//!
//! Trees are rebuilt on every traversal and never mutated afterwards. Absence
//! is not an error: a category that does not exist has an empty tree.

use docnav_storage::{ContentStore, Entry, StoreError, join_path};
use serde::Serialize;

use crate::routes::DocRoutes;

/// One node of a sidebar tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarItem {
    /// Leaf document.
    Document {
        /// Display title.
        title: String,
        /// Public href of the document.
        href: String,
    },
    /// Sub-folder with nested items.
    Group {
        /// Store path of the directory, used as the expand-state key.
        id: String,
        /// Display title.
        title: String,
        /// Href of the directory's index document, if it has one.
        #[serde(skip_serializing_if = "Option::is_none")]
        href: Option<String>,
        /// Nested items in declared order.
        items: Vec<SidebarItem>,
    },
    /// Visual divider.
    Separator {
        /// Optional label.
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

/// Build the sidebar tree beneath store directory `dir`.
///
/// Groups whose subtree holds no document and no index are dropped.
pub fn directory_items(
    store: &dyn ContentStore,
    routes: &DocRoutes,
    dir: &str,
) -> Result<Vec<SidebarItem>, StoreError> {
    let entries = store.list_entries(dir)?;
    let mut items = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry {
            Entry::Document { slug, title } => items.push(SidebarItem::Document {
                title,
                href: routes.href(&join_path(dir, &slug)),
            }),
            Entry::Directory { slug, title } => {
                let path = join_path(dir, &slug);
                let children = directory_items(store, routes, &path)?;
                let href = store.has_index(&path).then(|| routes.href(&path));
                if href.is_none() && !children.iter().any(is_navigable) {
                    continue;
                }
                items.push(SidebarItem::Group {
                    id: path,
                    title,
                    href,
                    items: children,
                });
            }
            Entry::Separator { title } => items.push(SidebarItem::Separator { title }),
        }
    }

    Ok(items)
}

/// Build the sidebar tree of a category.
pub fn category_docs(
    store: &dyn ContentStore,
    routes: &DocRoutes,
    category_id: &str,
) -> Result<Vec<SidebarItem>, StoreError> {
    directory_items(store, routes, category_id)
}

/// Check whether a category has its own index document.
pub fn category_has_index(store: &dyn ContentStore, category_id: &str) -> bool {
    store.has_index(category_id)
}

/// Href of the first navigable item, searching depth-first in order.
///
/// A group's own index comes before its children.
pub fn first_leaf(items: &[SidebarItem]) -> Option<&str> {
    items.iter().find_map(|item| match item {
        SidebarItem::Document { href, .. } => Some(href.as_str()),
        SidebarItem::Group { href, items, .. } => href.as_deref().or_else(|| first_leaf(items)),
        SidebarItem::Separator { .. } => None,
    })
}

/// Count document leaves in a tree. Index documents are not counted.
pub fn count_documents(items: &[SidebarItem]) -> usize {
    items
        .iter()
        .map(|item| match item {
            SidebarItem::Document { .. } => 1,
            SidebarItem::Group { items, .. } => count_documents(items),
            SidebarItem::Separator { .. } => 0,
        })
        .sum()
}

fn is_navigable(item: &SidebarItem) -> bool {
    !matches!(item, SidebarItem::Separator { .. })
}
