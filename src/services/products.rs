//! Product administration.

use serde::Serialize;

use crate::domain::category::{CategoryListQuery, CategoryTree};
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{AddProductForm, EditProductForm};
use crate::repository::{CategoryReader, ProductReader, ProductWriter};
use crate::services::categories::CategoryRow;
use crate::services::shop::ProductView;
use crate::services::{ServiceError, ServiceResult};

/// Product row shown on the admin page.
#[derive(Debug, Serialize, Clone)]
pub struct ProductRow {
    pub product: ProductView,
    /// Full path of the product's category.
    pub category_path: String,
}

/// Data required to render the product administration template.
pub struct ProductsAdminData {
    /// Every product, available or not, oldest first.
    pub products: Vec<ProductRow>,
    /// Category choices for the add/edit forms.
    pub categories: Vec<CategoryRow>,
}

/// Loads all products together with the category choices.
pub fn load_products<R>(repo: &R) -> ServiceResult<ProductsAdminData>
where
    R: CategoryReader + ProductReader + ?Sized,
{
    let tree = CategoryTree::new(
        repo.list_categories(CategoryListQuery::new())
            .map_err(ServiceError::from)?,
    );

    let path_of = |category_id: i32| {
        tree.path_string(category_id)
            .map_err(|err| ServiceError::Internal(err.to_string()))
    };

    let mut categories = Vec::with_capacity(tree.len());
    for category in tree.iter() {
        categories.push(CategoryRow {
            path: path_of(category.id)?,
            url: category.absolute_url(),
            category: category.clone(),
        });
    }
    categories.sort_by(|a, b| a.path.cmp(&b.path));

    let products = repo
        .list_products(ProductListQuery::new())
        .map_err(ServiceError::from)?;

    let mut rows = Vec::with_capacity(products.len());
    for product in products {
        rows.push(ProductRow {
            category_path: path_of(product.category_id)?,
            product: product.into(),
        });
    }

    Ok(ProductsAdminData {
        products: rows,
        categories,
    })
}

/// Creates a new product.
pub fn create_product<R>(repo: &R, form: AddProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    let new_product = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_product(&new_product)
        .map_err(ServiceError::from)
}

/// Replaces the editable fields of an existing product.
pub fn modify_product<R>(repo: &R, form: EditProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    let payload = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_product(payload.product_id, &payload.update)
        .map_err(ServiceError::from)
}

/// Deletes a product.
pub fn remove_product<R>(repo: &R, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    repo.delete_product(product_id).map_err(ServiceError::from)
}
