use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{NewCategory, UpdateCategory};
use crate::domain::slug::is_valid_slug;
use crate::forms::{parse_optional_id, sanitize_inline_text};

/// Maximum length allowed for a category name.
const NAME_MAX_LEN: usize = 250;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum length allowed for a category slug.
const SLUG_MAX_LEN_VALIDATOR: u64 = 250;

/// Result type returned by the category form helpers.
pub type CategoryFormResult<T> = Result<T, CategoryFormError>;

/// Errors that can occur while processing category forms.
#[derive(Debug, Error)]
pub enum CategoryFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("category name cannot be empty")]
    EmptyName,
    /// Supplied identifier field could not be parsed.
    #[error("invalid {field} `{value}`")]
    InvalidIdentifier { field: &'static str, value: String },
    /// Supplied slug is not lowercase and hyphen separated.
    #[error("invalid slug `{0}`")]
    InvalidSlug(String),
    /// A category cannot be its own parent.
    #[error("a category cannot be its own parent")]
    SelfParent,
}

/// Form payload emitted when submitting the "Add category" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCategoryForm {
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Optional parent category identifier in string form.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Optional explicit slug; generated when left blank.
    #[validate(length(max = SLUG_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub slug: Option<String>,
}

impl AddCategoryForm {
    /// Validates and sanitizes the payload into a domain `NewCategory`.
    pub fn into_new_category(self) -> CategoryFormResult<NewCategory> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(CategoryFormError::EmptyName);
        }

        let parent_id = parse_optional_id(self.parent_id).map_err(|value| {
            CategoryFormError::InvalidIdentifier {
                field: "parent category",
                value,
            }
        })?;
        let slug = checked_slug(self.slug)?;

        let mut new_category = NewCategory::new(sanitized_name);
        if let Some(parent_id) = parent_id {
            new_category = new_category.with_parent_id(parent_id);
        }
        if let Some(slug) = slug {
            new_category = new_category.with_slug(slug);
        }

        Ok(new_category)
    }
}

/// Normalized payload produced by the "Edit category" form.
#[derive(Debug)]
pub struct EditCategoryPayload {
    /// Identifier of the category to update.
    pub category_id: i32,
    /// Patch data that should be applied to the category.
    pub update: UpdateCategory,
}

/// Form payload emitted when editing an existing category.
#[derive(Debug, Deserialize, Validate)]
pub struct EditCategoryForm {
    /// Identifier of the category to update.
    #[validate(range(min = 1))]
    pub category_id: i32,
    /// Name submitted by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// New parent identifier; blank moves the category to the top level.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// New slug; blank keeps the current one.
    #[validate(length(max = SLUG_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub slug: Option<String>,
}

impl EditCategoryForm {
    /// Validates and sanitizes the payload into a domain `UpdateCategory`.
    pub fn into_update_category(self) -> CategoryFormResult<EditCategoryPayload> {
        self.validate()?;

        let EditCategoryForm {
            category_id,
            name,
            parent_id,
            slug,
        } = self;

        let name = sanitize_inline_text(&name);
        if name.is_empty() {
            return Err(CategoryFormError::EmptyName);
        }

        let parent_id = parse_optional_id(parent_id).map_err(|value| {
            CategoryFormError::InvalidIdentifier {
                field: "parent category",
                value,
            }
        })?;
        if parent_id == Some(category_id) {
            return Err(CategoryFormError::SelfParent);
        }

        let mut update = UpdateCategory::new(name, parent_id);
        if let Some(slug) = checked_slug(slug)? {
            update = update.with_slug(slug);
        }

        Ok(EditCategoryPayload {
            category_id,
            update,
        })
    }
}

/// Blank slugs become `None`; anything else must already be a valid slug.
fn checked_slug(value: Option<String>) -> CategoryFormResult<Option<String>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(slug) if is_valid_slug(slug) => Ok(Some(slug.to_string())),
        Some(slug) => Err(CategoryFormError::InvalidSlug(slug.to_string())),
    }
}
