//! Category administration.

use serde::Serialize;

use crate::domain::category::{Category, CategoryListQuery, CategoryTree};
use crate::forms::categories::{AddCategoryForm, EditCategoryForm};
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult};

/// Category row shown on the admin page.
#[derive(Debug, Serialize, Clone)]
pub struct CategoryRow {
    pub category: Category,
    /// Names from the root down to this category, joined by `>`.
    pub path: String,
    pub url: String,
}

/// Data required to render the category administration template.
pub struct CategoriesPageData {
    /// Every category, sorted by path.
    pub categories: Vec<CategoryRow>,
}

/// Loads all categories with their full paths.
pub fn load_categories<R>(repo: &R) -> ServiceResult<CategoriesPageData>
where
    R: CategoryReader + ?Sized,
{
    let tree = CategoryTree::new(
        repo.list_categories(CategoryListQuery::new())
            .map_err(ServiceError::from)?,
    );

    let mut categories = Vec::with_capacity(tree.len());
    for category in tree.iter() {
        let path = tree
            .path_string(category.id)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        categories.push(CategoryRow {
            url: category.absolute_url(),
            category: category.clone(),
            path,
        });
    }

    categories.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(CategoriesPageData { categories })
}

/// Creates a new category.
pub fn create_category<R>(repo: &R, form: AddCategoryForm) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    let new_category = form
        .into_new_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = repo
        .create_category(&new_category)
        .map_err(ServiceError::from)?;

    log::info!("Created category {} with slug `{}`", created.id, created.slug);

    Ok(created)
}

/// Renames, re-parents or re-slugs an existing category.
pub fn modify_category<R>(repo: &R, form: EditCategoryForm) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    let payload = form
        .into_update_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_category(payload.category_id, &payload.update)
        .map_err(ServiceError::from)
}

/// Deletes a category together with its subtree and products.
pub fn remove_category<R>(repo: &R, category_id: i32) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    repo.delete_category(category_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::repository::RepositoryError;
    use crate::repository::mock::{MockCategoryReader, MockCategoryWriter};

    fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2024, 1, 1) {
            Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    fn sample_category(id: i32, parent_id: Option<i32>, name: &str) -> Category {
        Category {
            id,
            parent_id,
            name: name.to_string(),
            slug: format!("slug-{id}"),
            created_at: fixed_datetime(),
        }
    }

    #[test]
    fn load_categories_returns_sorted_paths() {
        let mut repo = MockCategoryReader::new();

        repo.expect_list_categories()
            .times(1)
            .returning(|query| {
                assert!(!query.top_level_only);
                Ok(vec![
                    sample_category(1, None, "Electronics"),
                    sample_category(2, Some(1), "Phones"),
                    sample_category(3, None, "Books"),
                    sample_category(4, Some(2), "Smartphones"),
                ])
            });

        let data = load_categories(&repo).expect("expected success");

        let paths: Vec<&str> = data.categories.iter().map(|row| row.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "Books",
                "Electronics",
                "Electronics>Phones",
                "Electronics>Phones>Smartphones"
            ]
        );
        assert_eq!(data.categories[0].url, "/categories/slug-3");
    }

    #[test]
    fn create_category_validates_form() {
        let repo = MockCategoryWriter::new();
        let form = AddCategoryForm {
            name: "   ".to_string(),
            parent_id: None,
            slug: None,
        };

        let result = create_category(&repo, form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_category_persists_new_entry() {
        let mut repo = MockCategoryWriter::new();

        repo.expect_create_category()
            .times(1)
            .withf(|new_category| {
                assert_eq!(new_category.name, "Fresh Produce");
                assert_eq!(new_category.parent_id, Some(4));
                assert!(new_category.slug.is_none());
                true
            })
            .returning(|_| Ok(sample_category(10, Some(4), "Fresh Produce")));

        let form = AddCategoryForm {
            name: "  Fresh   Produce ".to_string(),
            parent_id: Some("4".to_string()),
            slug: None,
        };

        let created = create_category(&repo, form).expect("expected success");

        assert_eq!(created.id, 10);
        assert_eq!(created.name, "Fresh Produce");
    }

    #[test]
    fn create_category_reports_duplicates_as_conflict() {
        let mut repo = MockCategoryWriter::new();

        repo.expect_create_category().times(1).returning(|_| {
            Err(RepositoryError::ConstraintViolation(
                "category `django` already exists under the same parent".to_string(),
            ))
        });

        let form = AddCategoryForm {
            name: "django".to_string(),
            parent_id: None,
            slug: None,
        };

        let result = create_category(&repo, form);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn modify_category_updates_entry() {
        let mut repo = MockCategoryWriter::new();

        repo.expect_update_category()
            .times(1)
            .withf(|category_id, updates| {
                assert_eq!(*category_id, 3);
                assert_eq!(updates.name, "Dry Goods");
                assert_eq!(updates.parent_id, None);
                true
            })
            .returning(|_, _| Ok(sample_category(3, None, "Dry Goods")));

        let form = EditCategoryForm {
            category_id: 3,
            name: " Dry Goods ".to_string(),
            parent_id: Some(String::new()),
            slug: None,
        };

        let updated = modify_category(&repo, form).expect("expected success");

        assert_eq!(updated.id, 3);
    }

    #[test]
    fn remove_category_deletes_entry() {
        let mut repo = MockCategoryWriter::new();

        repo.expect_delete_category()
            .times(1)
            .withf(|category_id| *category_id == 2)
            .returning(|_| Ok(()));

        assert!(remove_category(&repo, 2).is_ok());
    }

    #[test]
    fn remove_category_reports_missing_entry() {
        let mut repo = MockCategoryWriter::new();

        repo.expect_delete_category()
            .returning(|_| Err(RepositoryError::NotFound));

        let result = remove_category(&repo, 99);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
