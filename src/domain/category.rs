use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator placed between category names in a path string.
pub const PATH_SEPARATOR: &str = ">";

/// Domain representation of a node in the catalog taxonomy.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier of the category.
    pub id: i32,
    /// Identifier of the parent category; `None` for top-level categories.
    pub parent_id: Option<i32>,
    /// Display name, unique among its siblings.
    pub name: String,
    /// Globally unique URL slug.
    pub slug: String,
    /// Timestamp for when the category record was created.
    pub created_at: NaiveDateTime,
}

impl Category {
    /// Canonical URL of the category listing page.
    pub fn absolute_url(&self) -> String {
        format!("/categories/{}", self.slug)
    }
}

/// Payload required to insert a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Optional identifier of the parent category.
    pub parent_id: Option<i32>,
    /// Display name of the category.
    pub name: String,
    /// Explicit slug; a randomized one is generated on insert when absent.
    pub slug: Option<String>,
}

impl NewCategory {
    /// Build a top-level category payload without an explicit slug.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            parent_id: None,
            name: name.into(),
            slug: None,
        }
    }

    /// Attach a parent identifier to the category payload.
    pub fn with_parent_id(mut self, parent_id: i32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Use `slug` verbatim instead of generating one.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Patch data applied when updating an existing category.
#[derive(Debug, Clone)]
pub struct UpdateCategory {
    /// New name for the category.
    pub name: String,
    /// New parent; `None` moves the category to the top level.
    pub parent_id: Option<i32>,
    /// New slug; `None` keeps the current one.
    pub slug: Option<String>,
}

impl UpdateCategory {
    /// Build a category update payload with the supplied values.
    pub fn new(name: impl Into<String>, parent_id: Option<i32>) -> Self {
        Self {
            name: name.into(),
            parent_id,
            slug: None,
        }
    }

    /// Replace the slug as part of the update.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Query definition used to list categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Restrict the results to categories without a parent.
    pub top_level_only: bool,
}

impl CategoryListQuery {
    /// Construct a query returning every category.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a query returning only top-level categories.
    pub fn top_level() -> Self {
        Self {
            top_level_only: true,
        }
    }
}

/// Errors produced while walking a category tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryTreeError {
    #[error("category {0} does not exist")]
    UnknownCategory(i32),
    #[error("category {child} references missing parent {parent}")]
    MissingParent { child: i32, parent: i32 },
    #[error("category {0} is part of a parent cycle")]
    Cycle(i32),
}

/// Arena of categories indexed by identifier.
///
/// Parents are stored as ids, so walking the tree never follows references and
/// a corrupted parent chain is reported instead of looping forever.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: HashMap<i32, Category>,
    order: Vec<i32>,
}

impl CategoryTree {
    /// Build an arena from `categories`, keeping their order for iteration.
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut tree = Self::default();
        for category in categories {
            if !tree.nodes.contains_key(&category.id) {
                tree.order.push(category.id);
            }
            tree.nodes.insert(category.id, category);
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Categories in the order they were supplied.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Ancestors of `id` followed by the category itself, root first.
    pub fn path(&self, id: i32) -> Result<Vec<&Category>, CategoryTreeError> {
        let mut current = self
            .nodes
            .get(&id)
            .ok_or(CategoryTreeError::UnknownCategory(id))?;
        let mut visited = HashSet::from([current.id]);
        let mut path = vec![current];

        while let Some(parent_id) = current.parent_id {
            if !visited.insert(parent_id) {
                return Err(CategoryTreeError::Cycle(parent_id));
            }
            current = self
                .nodes
                .get(&parent_id)
                .ok_or(CategoryTreeError::MissingParent {
                    child: current.id,
                    parent: parent_id,
                })?;
            path.push(current);
        }

        path.reverse();
        Ok(path)
    }

    /// Names along the path to `id` joined by [`PATH_SEPARATOR`].
    pub fn path_string(&self, id: i32) -> Result<String, CategoryTreeError> {
        let names: Vec<&str> = self
            .path(id)?
            .into_iter()
            .map(|category| category.name.as_str())
            .collect();
        Ok(names.join(PATH_SEPARATOR))
    }
}
