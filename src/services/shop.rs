//! Public storefront pages: product list, product detail and category listing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::{Category, CategoryListQuery, CategoryTree};
use crate::domain::product::{Product, ProductListQuery, ProductWithCategory};
use crate::repository::{CategoryReader, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// How product detail lookups treat several products sharing one slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlugPolicy {
    /// Pick the oldest matching product.
    #[default]
    FirstMatch,
    /// Refuse to pick and report [`ServiceError::Ambiguous`].
    Unique,
}

/// View model exposed to the storefront templates and the JSON API.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub id: i32,
    pub category_id: i32,
    pub title: String,
    pub brand: String,
    pub description: Option<String>,
    pub slug: String,
    /// Price formatted with two decimals.
    pub price: String,
    pub image: String,
    pub available: bool,
    pub url: String,
    /// Category data when it was joined into the query.
    pub category: Option<Category>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            price: product.price(),
            url: product.absolute_url(),
            id: product.id,
            category_id: product.category_id,
            title: product.title,
            brand: product.brand,
            description: product.description,
            slug: product.slug,
            image: product.image,
            available: product.available,
            category: None,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<ProductWithCategory> for ProductView {
    fn from(value: ProductWithCategory) -> Self {
        let mut view = ProductView::from(value.product);
        view.category = Some(value.category);
        view
    }
}

/// Data required to render the product list template.
pub struct ProductsPageData {
    /// Available products in creation order.
    pub products: Vec<ProductView>,
}

/// Data required to render the product detail template.
pub struct ProductDetailData {
    pub product: ProductView,
}

/// Data required to render the category listing template.
pub struct CategoryPageData {
    pub category: Category,
    /// Names from the root category down to this one, joined by `>`.
    pub path: String,
    /// Available products of the category, each carrying the category.
    pub products: Vec<ProductView>,
}

/// Loads the top-level categories shown in the site navigation.
pub fn load_navigation<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader + ?Sized,
{
    repo.list_categories(CategoryListQuery::top_level())
        .map_err(ServiceError::from)
}

/// Loads every available product.
pub fn load_products_page<R>(repo: &R) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + ?Sized,
{
    let products = repo
        .list_products(ProductListQuery::available())
        .map_err(ServiceError::from)?;

    Ok(ProductsPageData {
        products: products.into_iter().map(ProductView::from).collect(),
    })
}

/// Loads an available product by slug.
pub fn load_product_detail<R>(
    repo: &R,
    slug: &str,
    policy: SlugPolicy,
) -> ServiceResult<ProductDetailData>
where
    R: ProductReader + ?Sized,
{
    let mut matches = repo
        .list_products_with_category(ProductListQuery::available().slug(slug))
        .map_err(ServiceError::from)?;

    if matches.len() > 1 {
        if policy == SlugPolicy::Unique {
            return Err(ServiceError::Ambiguous);
        }
        log::warn!(
            "{} products share slug `{slug}`, showing product {}",
            matches.len(),
            matches[0].product.id
        );
    }

    if matches.is_empty() {
        return Err(ServiceError::NotFound);
    }

    let first = matches.swap_remove(0);

    Ok(ProductDetailData {
        product: first.into(),
    })
}

/// Loads a category by slug together with its available products.
pub fn load_category_page<R>(repo: &R, slug: &str) -> ServiceResult<CategoryPageData>
where
    R: CategoryReader + ProductReader + ?Sized,
{
    let category = repo
        .get_category_by_slug(slug)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let tree = CategoryTree::new(
        repo.list_categories(CategoryListQuery::new())
            .map_err(ServiceError::from)?,
    );
    let path = tree
        .path_string(category.id)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;

    let products = repo
        .list_products_with_category(ProductListQuery::available().in_category(category.id))
        .map_err(ServiceError::from)?;

    Ok(CategoryPageData {
        category,
        path,
        products: products.into_iter().map(ProductView::from).collect(),
    })
}

/// Query parameters accepted by the products API.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsApiQuery {
    /// Optional category slug restricting the results.
    pub category: Option<String>,
}

/// Loads available products, optionally restricted to one category.
pub fn load_products_api<R>(repo: &R, query: ProductsApiQuery) -> ServiceResult<Vec<ProductView>>
where
    R: CategoryReader + ProductReader + ?Sized,
{
    let mut list_query = ProductListQuery::available();

    if let Some(slug) = query.category.as_deref().filter(|slug| !slug.is_empty()) {
        let category = repo
            .get_category_by_slug(slug)
            .map_err(ServiceError::from)?
            .ok_or(ServiceError::NotFound)?;
        list_query = list_query.in_category(category.id);
    }

    let products = repo
        .list_products_with_category(list_query)
        .map_err(ServiceError::from)?;

    Ok(products.into_iter().map(ProductView::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::repository::RepositoryError;
    use crate::repository::mock::{MockCatalog, MockCategoryReader, MockProductReader};

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
            slug: format!("abc-pickbetter{}", name.to_lowercase()),
            created_at: fixed_datetime(),
        }
    }

    fn sample_product(id: i32, category_id: i32, slug: &str) -> Product {
        Product {
            id,
            category_id,
            title: format!("Product {id}"),
            brand: "Acme".to_string(),
            description: None,
            slug: slug.to_string(),
            price_cents: 9_999,
            image: "products/products/2024/01/01/p.gif".to_string(),
            available: true,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn joined(product: Product, category: &Category) -> ProductWithCategory {
        ProductWithCategory {
            product,
            category: category.clone(),
        }
    }

    #[test]
    fn load_navigation_requests_top_level_categories() {
        let mut repo = MockCategoryReader::new();
        repo.expect_list_categories()
            .times(1)
            .withf(|query| query.top_level_only)
            .returning(|_| Ok(vec![sample_category(1, None, "Django")]));

        let categories = load_navigation(&repo).expect("expected success");

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Django");
    }

    #[test]
    fn load_products_page_uses_availability_projection() {
        let mut repo = MockProductReader::new();
        repo.expect_list_products()
            .times(1)
            .withf(|query| *query == ProductListQuery::available())
            .returning(|_| {
                Ok(vec![
                    sample_product(1, 1, "product-1"),
                    sample_product(2, 1, "product-2"),
                ])
            });

        let data = load_products_page(&repo).expect("expected success");

        let titles: Vec<&str> = data.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Product 1", "Product 2"]);
        assert_eq!(data.products[0].price, "99.99");
        assert_eq!(data.products[0].url, "/products/product-1");
    }

    #[test]
    fn load_product_detail_returns_match() {
        let mut repo = MockProductReader::new();
        let category = sample_category(1, None, "Django");
        repo.expect_list_products_with_category()
            .times(1)
            .withf(|query| {
                query.available_only && query.slug.as_deref() == Some("product-1")
            })
            .returning(move |_| Ok(vec![joined(sample_product(1, 1, "product-1"), &category)]));

        let data =
            load_product_detail(&repo, "product-1", SlugPolicy::FirstMatch).expect("expected success");

        assert_eq!(data.product.id, 1);
        assert_eq!(
            data.product.category.as_ref().map(|c| c.name.as_str()),
            Some("Django")
        );
    }

    #[test]
    fn load_product_detail_reports_missing_slug() {
        let mut repo = MockProductReader::new();
        repo.expect_list_products_with_category()
            .returning(|_| Ok(Vec::new()));

        let result = load_product_detail(&repo, "missing", SlugPolicy::FirstMatch);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn load_product_detail_picks_first_duplicate_by_default() {
        let mut repo = MockProductReader::new();
        let category = sample_category(1, None, "Django");
        repo.expect_list_products_with_category()
            .returning(move |_| {
                Ok(vec![
                    joined(sample_product(3, 1, "dup"), &category),
                    joined(sample_product(7, 1, "dup"), &category),
                ])
            });

        let data = load_product_detail(&repo, "dup", SlugPolicy::FirstMatch).expect("expected success");

        assert_eq!(data.product.id, 3);
    }

    #[test]
    fn load_product_detail_rejects_duplicates_when_strict() {
        let mut repo = MockProductReader::new();
        let category = sample_category(1, None, "Django");
        repo.expect_list_products_with_category()
            .returning(move |_| {
                Ok(vec![
                    joined(sample_product(3, 1, "dup"), &category),
                    joined(sample_product(7, 1, "dup"), &category),
                ])
            });

        let result = load_product_detail(&repo, "dup", SlugPolicy::Unique);

        assert!(matches!(result, Err(ServiceError::Ambiguous)));
    }

    #[test]
    fn load_category_page_joins_products_and_builds_path() {
        let mut repo = MockCatalog::new();
        let root = sample_category(1, None, "Electronics");
        let phones = sample_category(2, Some(1), "Phones");

        let lookup = phones.clone();
        repo.expect_get_category_by_slug()
            .times(1)
            .withf(|slug| slug == "abc-pickbetterphones")
            .returning(move |_| Ok(Some(lookup.clone())));

        let all = vec![root.clone(), phones.clone()];
        repo.expect_list_categories()
            .times(1)
            .withf(|query| !query.top_level_only)
            .returning(move |_| Ok(all.clone()));

        let joined_category = phones.clone();
        repo.expect_list_products_with_category()
            .times(1)
            .withf(|query| query.available_only && query.category_id == Some(2))
            .returning(move |_| {
                Ok(vec![joined(
                    sample_product(5, 2, "smartphone"),
                    &joined_category,
                )])
            });

        let data = load_category_page(&repo, "abc-pickbetterphones").expect("expected success");

        assert_eq!(data.category, phones);
        assert_eq!(data.path, "Electronics>Phones");
        assert_eq!(data.products.len(), 1);
        assert_eq!(data.products[0].category.as_ref(), Some(&phones));
    }

    #[test]
    fn load_category_page_reports_unknown_slug() {
        let mut repo = MockCatalog::new();
        repo.expect_get_category_by_slug().returning(|_| Ok(None));

        let result = load_category_page(&repo, "nope");

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn load_category_page_flags_parent_cycles() {
        let mut repo = MockCatalog::new();
        let a = sample_category(1, Some(2), "A");
        let b = sample_category(2, Some(1), "B");

        let lookup = a.clone();
        repo.expect_get_category_by_slug()
            .returning(move |_| Ok(Some(lookup.clone())));
        repo.expect_list_categories()
            .returning(move |_| Ok(vec![a.clone(), b.clone()]));

        let result = load_category_page(&repo, "a");

        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }

    #[test]
    fn load_products_api_filters_by_category_slug() {
        let mut repo = MockCatalog::new();
        let category = sample_category(4, None, "Books");

        let lookup = category.clone();
        repo.expect_get_category_by_slug()
            .times(1)
            .returning(move |_| Ok(Some(lookup.clone())));
        repo.expect_list_products_with_category()
            .times(1)
            .withf(|query| query.available_only && query.category_id == Some(4))
            .returning(move |_| Ok(vec![joined(sample_product(9, 4, "novel"), &category)]));

        let products = load_products_api(
            &repo,
            ProductsApiQuery {
                category: Some("abc-pickbetterbooks".to_string()),
            },
        )
        .expect("expected success");

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].slug, "novel");
    }

    #[test]
    fn product_view_serializes_price_url_and_category() {
        use serde_json::Value;

        let category = sample_category(4, None, "Books");
        let view = ProductView::from(joined(sample_product(9, 4, "novel"), &category));

        let serialized = serde_json::to_value(&view).expect("serialization should succeed");

        assert_eq!(serialized["price"], Value::String("99.99".to_string()));
        assert_eq!(serialized["url"], Value::String("/products/novel".to_string()));
        assert_eq!(serialized["category"]["name"], Value::String("Books".to_string()));
        assert_eq!(serialized["available"], Value::Bool(true));
    }

    #[test]
    fn repository_failures_become_internal_errors() {
        let mut repo = MockProductReader::new();
        repo.expect_list_products()
            .returning(|_| Err(RepositoryError::Inconsistent("broken".to_string())));

        let result = load_products_page(&repo);

        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }
}
