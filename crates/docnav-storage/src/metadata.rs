//! Directory metadata parsing.
//!
//! Each directory may carry a YAML sidecar (`meta.yaml` by default):
//!
//! ```yaml
//! title: User Guide
//! order: 1
//! items:
//!   - intro
//!   - slug: advanced
//!     title: Advanced Topics
//!   - separator: Reference
//!   - api
//! ```
//!
//! `title` and `order` describe the directory itself. `items` declares the
//! order (and optional titles) of entries beneath it; entries not declared
//! follow alphabetically.

use serde::Deserialize;

use crate::store::Entry;

/// Parsed directory metadata.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct DirMetadata {
    /// Display title of the directory.
    pub title: Option<String>,
    /// Position among siblings (used for categories).
    pub order: Option<u32>,
    /// Declared entry ordering.
    pub items: Vec<ItemDecl>,
}

/// One declared entry in `items`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemDecl {
    /// Bare slug.
    Slug(String),
    /// Slug with a title override.
    Titled {
        slug: String,
        #[serde(default)]
        title: Option<String>,
    },
    /// Divider with optional label.
    Separator { separator: Option<String> },
}

/// Error type for metadata parsing.
#[derive(Debug, thiserror::Error)]
pub(crate) enum MetadataError {
    /// Malformed YAML.
    #[error("Invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Parse directory metadata from YAML content.
///
/// Empty content yields default metadata.
pub(crate) fn parse_dir_metadata(content: &str) -> Result<DirMetadata, MetadataError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(DirMetadata::default());
    }
    Ok(serde_yaml::from_str(trimmed)?)
}

impl DirMetadata {
    /// Arrange discovered entries by the declared `items` order.
    ///
    /// Declared entries come first, in declaration order, with title overrides
    /// applied. Declared slugs that were not discovered are skipped. The rest
    /// follow sorted case-insensitively by slug.
    pub(crate) fn arrange(&self, found: Vec<Entry>) -> Vec<Entry> {
        let mut remaining: Vec<Option<Entry>> = found.into_iter().map(Some).collect();
        let mut ordered = Vec::with_capacity(remaining.len() + self.items.len());

        for decl in &self.items {
            let (slug, title) = match decl {
                ItemDecl::Separator { separator } => {
                    ordered.push(Entry::Separator {
                        title: separator.clone(),
                    });
                    continue;
                }
                ItemDecl::Slug(slug) => (slug, None),
                ItemDecl::Titled { slug, title } => (slug, title.as_ref()),
            };

            let position = remaining
                .iter()
                .position(|e| e.as_ref().is_some_and(|e| entry_slug(e) == Some(slug.as_str())));
            let Some(entry) = position.and_then(|i| remaining[i].take()) else {
                tracing::debug!(slug = %slug, "Declared item not found, skipping");
                continue;
            };
            ordered.push(match title {
                Some(title) => retitle(entry, title.clone()),
                None => entry,
            });
        }

        let mut rest: Vec<Entry> = remaining.into_iter().flatten().collect();
        rest.sort_by_cached_key(|e| entry_slug(e).map(str::to_lowercase));
        ordered.extend(rest);
        ordered
    }
}

fn entry_slug(entry: &Entry) -> Option<&str> {
    match entry {
        Entry::Document { slug, .. } | Entry::Directory { slug, .. } => Some(slug),
        Entry::Separator { .. } => None,
    }
}

fn retitle(entry: Entry, title: String) -> Entry {
    match entry {
        Entry::Document { slug, .. } => Entry::Document { slug, title },
        Entry::Directory { slug, .. } => Entry::Directory { slug, title },
        separator @ Entry::Separator { .. } => separator,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(slug: &str) -> Entry {
        Entry::Document {
            slug: slug.to_owned(),
            title: slug.to_owned(),
        }
    }

    fn dir(slug: &str) -> Entry {
        Entry::Directory {
            slug: slug.to_owned(),
            title: slug.to_owned(),
        }
    }

    #[test]
    fn test_parse_empty() {
        let meta = parse_dir_metadata("  \n").unwrap();

        assert_eq!(meta, DirMetadata::default());
    }

    #[test]
    fn test_parse_title_and_order() {
        let meta = parse_dir_metadata("title: User Guide\norder: 2").unwrap();

        assert_eq!(meta.title, Some("User Guide".to_owned()));
        assert_eq!(meta.order, Some(2));
        assert!(meta.items.is_empty());
    }

    #[test]
    fn test_parse_items_all_forms() {
        let yaml = r"
items:
  - intro
  - slug: advanced
    title: Advanced Topics
  - separator: Reference
  - separator:
";
        let meta = parse_dir_metadata(yaml).unwrap();

        assert_eq!(
            meta.items,
            vec![
                ItemDecl::Slug("intro".to_owned()),
                ItemDecl::Titled {
                    slug: "advanced".to_owned(),
                    title: Some("Advanced Topics".to_owned()),
                },
                ItemDecl::Separator {
                    separator: Some("Reference".to_owned()),
                },
                ItemDecl::Separator { separator: None },
            ]
        );
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(parse_dir_metadata("title: [broken").is_err());
    }

    #[test]
    fn test_arrange_without_declarations_sorts_alphabetically() {
        let meta = DirMetadata::default();

        let arranged = meta.arrange(vec![doc("Zeta"), dir("beta"), doc("alpha")]);

        assert_eq!(arranged, vec![doc("alpha"), dir("beta"), doc("Zeta")]);
    }

    #[test]
    fn test_arrange_declared_first_then_rest() {
        let meta = DirMetadata {
            items: vec![
                ItemDecl::Slug("zeta".to_owned()),
                ItemDecl::Separator {
                    separator: Some("More".to_owned()),
                },
                ItemDecl::Titled {
                    slug: "beta".to_owned(),
                    title: Some("Beta Guide".to_owned()),
                },
            ],
            ..Default::default()
        };

        let arranged = meta.arrange(vec![doc("alpha"), dir("beta"), doc("zeta"), doc("gamma")]);

        assert_eq!(
            arranged,
            vec![
                doc("zeta"),
                Entry::Separator {
                    title: Some("More".to_owned())
                },
                Entry::Directory {
                    slug: "beta".to_owned(),
                    title: "Beta Guide".to_owned(),
                },
                doc("alpha"),
                doc("gamma"),
            ]
        );
    }

    #[test]
    fn test_arrange_skips_missing_declarations() {
        let meta = DirMetadata {
            items: vec![
                ItemDecl::Slug("ghost".to_owned()),
                ItemDecl::Slug("real".to_owned()),
            ],
            ..Default::default()
        };

        let arranged = meta.arrange(vec![doc("real")]);

        assert_eq!(arranged, vec![doc("real")]);
    }
}
