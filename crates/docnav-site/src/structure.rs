//! Aggregated navigation structure across all categories.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use docnav_storage::{Category, ContentStore, StoreError};
use serde::Serialize;

use crate::routes::DocRoutes;
use crate::tree::{SidebarItem, category_docs, category_has_index, count_documents, first_leaf};

/// A category with its sidebar tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithDocs {
    /// Category definition.
    #[serde(flatten)]
    pub category: Category,
    /// Sidebar tree of the category.
    pub docs: Vec<SidebarItem>,
    /// Whether the category has its own index document.
    pub has_index: bool,
    /// Href of the category landing document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_doc_path: Option<String>,
}

/// Navigation structure of the whole corpus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalDocsStructure {
    /// Categories in `(order, id)` order.
    pub categories: Vec<CategoryWithDocs>,
    /// Href of the first available document, or the route root when none exists.
    pub first_doc_path: String,
    /// Number of document leaves across all categories.
    pub total_docs: usize,
}

impl GlobalDocsStructure {
    /// Look up a category by id.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&CategoryWithDocs> {
        self.categories.iter().find(|c| c.category.id == id)
    }

    /// Whether there is nothing to navigate to yet.
    ///
    /// True when there are no categories, or when no category offers a
    /// document or landing page.
    #[must_use]
    pub fn is_building(&self) -> bool {
        self.categories.is_empty()
            || (self.total_docs == 0 && self.categories.iter().all(|c| c.first_doc_path.is_none()))
    }

    /// Ids of every expandable node: categories and nested groups.
    #[must_use]
    pub fn group_ids(&self) -> BTreeSet<&str> {
        fn collect<'a>(items: &'a [SidebarItem], ids: &mut BTreeSet<&'a str>) {
            for item in items {
                if let SidebarItem::Group { id, items, .. } = item {
                    ids.insert(id);
                    collect(items, ids);
                }
            }
        }

        let mut ids = BTreeSet::new();
        for category in &self.categories {
            ids.insert(category.category.id.as_str());
            collect(&category.docs, &mut ids);
        }
        ids
    }
}

/// Walks every category and aggregates the [`GlobalDocsStructure`].
#[derive(Clone)]
pub struct StructureBuilder {
    store: Arc<dyn ContentStore>,
    routes: DocRoutes,
}

impl StructureBuilder {
    /// Create a builder over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, routes: DocRoutes) -> Self {
        Self { store, routes }
    }

    /// Content store being walked.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Route mapping used for hrefs.
    #[must_use]
    pub fn routes(&self) -> &DocRoutes {
        &self.routes
    }

    /// Build the structure from the current store contents.
    ///
    /// A category's landing document is its index if it has one, otherwise
    /// its first leaf. The global first document is the landing document of
    /// the first category that has one.
    pub fn build(&self) -> Result<GlobalDocsStructure, StoreError> {
        let start = Instant::now();
        let store = self.store.as_ref();
        let categories = store.list_categories()?;

        let mut result = Vec::with_capacity(categories.len());
        let mut total_docs = 0;
        let mut first_doc_path = None;

        for category in categories {
            let docs = category_docs(store, &self.routes, &category.id)?;
            let has_index = category_has_index(store, &category.id);
            let category_first = if has_index {
                Some(self.routes.href(&category.id))
            } else {
                first_leaf(&docs).map(str::to_owned)
            };

            total_docs += count_documents(&docs);
            if first_doc_path.is_none() {
                first_doc_path.clone_from(&category_first);
            }

            result.push(CategoryWithDocs {
                category,
                docs,
                has_index,
                first_doc_path: category_first,
            });
        }

        tracing::debug!(
            categories = result.len(),
            total_docs,
            elapsed_ms = start.elapsed().as_millis(),
            "Built docs structure"
        );

        Ok(GlobalDocsStructure {
            categories: result,
            first_doc_path: first_doc_path.unwrap_or_else(|| self.routes.root().to_owned()),
            total_docs,
        })
    }
}
