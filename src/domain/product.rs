use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::price::{DEFAULT_PRICE_CENTS, format_price_cents};

/// Domain representation of a sellable catalog item.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Category the product is listed under.
    pub category_id: i32,
    /// Human-readable title.
    pub title: String,
    /// Brand or manufacturer name.
    pub brand: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// URL slug used by the detail page; not unique.
    pub slug: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Opaque reference to the product image asset.
    pub image: String,
    /// Whether the product is currently offered for sale.
    pub available: bool,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Price rendered with two decimal places.
    pub fn price(&self) -> String {
        format_price_cents(self.price_cents)
    }

    /// Canonical URL of the product detail page.
    pub fn absolute_url(&self) -> String {
        format!("/products/{}", self.slug)
    }
}

/// Product loaded together with the category it belongs to.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ProductWithCategory {
    pub product: Product,
    pub category: Category,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Category the product belongs to; must exist.
    pub category_id: i32,
    /// Human-readable title.
    pub title: String,
    /// Brand or manufacturer name.
    pub brand: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// URL slug for the detail page.
    pub slug: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Opaque reference to the product image asset.
    pub image: String,
    /// Whether the product is offered for sale.
    pub available: bool,
    /// Timestamp captured when the product payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a product payload with the default price and availability.
    pub fn new(
        category_id: i32,
        title: impl Into<String>,
        brand: impl Into<String>,
        image: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            category_id,
            title: title.into(),
            brand: brand.into(),
            description: None,
            slug: slug.into(),
            price_cents: DEFAULT_PRICE_CENTS,
            image: image.into(),
            available: true,
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the default price.
    pub fn with_price_cents(mut self, price_cents: i64) -> Self {
        self.price_cents = price_cents;
        self
    }

    /// Override the default availability.
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }
}

/// Replacement values applied when editing a product.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub category_id: i32,
    pub title: String,
    pub brand: String,
    /// New description; `None` clears it.
    pub description: Option<String>,
    pub slug: String,
    pub price_cents: i64,
    pub image: String,
    pub available: bool,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateProduct {
    /// Start an update that keeps every field of `product` unchanged.
    pub fn from_product(product: &Product) -> Self {
        Self {
            category_id: product.category_id,
            title: product.title.clone(),
            brand: product.brand.clone(),
            description: product.description.clone(),
            slug: product.slug.clone(),
            price_cents: product.price_cents,
            image: product.image.clone(),
            available: product.available,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Composable product filter.
///
/// Every predicate is compiled into a single SQL statement by the repository,
/// so [`ProductListQuery::available`] can be narrowed further without loading
/// the unfiltered set first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListQuery {
    /// Only return products with `available = true`.
    pub available_only: bool,
    /// Only return products attached to this category.
    pub category_id: Option<i32>,
    /// Only return products with this exact slug.
    pub slug: Option<String>,
}

impl ProductListQuery {
    /// Construct a query returning every product, available or not.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct the availability projection: products offered for sale.
    pub fn available() -> Self {
        Self {
            available_only: true,
            ..Self::default()
        }
    }

    /// Narrow the query to a single category.
    pub fn in_category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Narrow the query to an exact slug.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product(id: i32, category_id: i32, slug: &str, available: bool) -> Product {
        let now = Local::now().naive_utc();
        Product {
            id,
            category_id,
            title: format!("Product {id}"),
            brand: String::new(),
            description: None,
            slug: slug.to_string(),
            price_cents: DEFAULT_PRICE_CENTS,
            image: String::new(),
            available,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn new_product_uses_defaults() {
        let product = NewProduct::new(3, "Product 1", "Acme", "products/p1.gif", "product-1");

        assert_eq!(product.price_cents, 9_999);
        assert!(product.available);
        assert!(product.description.is_none());
    }

    #[test]
    fn available_query_chains_category_and_slug() {
        let query = ProductListQuery::available().in_category(2).slug("phone");

        assert!(query.available_only);
        assert_eq!(query.category_id, Some(2));
        assert_eq!(query.slug.as_deref(), Some("phone"));
    }

    #[test]
    fn unfiltered_query_has_no_predicates() {
        assert_eq!(ProductListQuery::new(), ProductListQuery::default());
        assert!(!ProductListQuery::new().available_only);
    }

    #[test]
    fn price_is_rendered_with_two_decimals() {
        let product = sample_product(1, 1, "a", true);

        assert_eq!(product.price(), "99.99");
        assert_eq!(product.absolute_url(), "/products/a");
    }
}
