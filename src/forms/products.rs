use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::price::{DEFAULT_PRICE_CENTS, PriceError, parse_price_cents};
use crate::domain::product::{NewProduct, UpdateProduct};
use crate::domain::slug::{is_valid_slug, slugify};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for titles, brands and slugs.
const TEXT_MAX_LEN_VALIDATOR: u64 = 250;

/// Maximum allowed length for an image reference.
const IMAGE_MAX_LEN_VALIDATOR: u64 = 255;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided title is empty after sanitization.
    #[error("product title cannot be empty")]
    EmptyTitle,
    /// No image reference was supplied.
    #[error("product image cannot be empty")]
    EmptyImage,
    /// The slug is malformed or could not be derived from the title.
    #[error("invalid slug `{0}`")]
    InvalidSlug(String),
    /// The price could not be parsed.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// Form payload emitted when submitting the "Add product" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    /// Category the product is listed under.
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(length(min = 1, max = TEXT_MAX_LEN_VALIDATOR))]
    pub title: String,
    #[validate(length(max = TEXT_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Optional slug; derived from the title when blank.
    #[validate(length(max = TEXT_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub slug: Option<String>,
    /// Decimal price; the default price applies when blank.
    #[serde(default)]
    pub price: Option<String>,
    #[validate(length(max = IMAGE_MAX_LEN_VALIDATOR))]
    pub image: String,
    /// Checkbox state; an unchecked box is omitted by the browser.
    #[serde(default)]
    pub available: bool,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let fields = ProductFields::sanitize(
            &self.title,
            &self.brand,
            self.description.as_deref(),
            self.slug.as_deref(),
            self.price.as_deref(),
            &self.image,
        )?;

        let mut new_product = NewProduct::new(
            self.category_id,
            fields.title,
            fields.brand,
            fields.image,
            fields.slug,
        )
        .with_price_cents(fields.price_cents)
        .with_available(self.available);

        if let Some(description) = fields.description {
            new_product = new_product.with_description(description);
        }

        Ok(new_product)
    }
}

/// Normalized payload produced by the "Edit product" form.
#[derive(Debug)]
pub struct EditProductPayload {
    pub product_id: i32,
    pub update: UpdateProduct,
}

/// Form payload emitted when editing an existing product.
#[derive(Debug, Deserialize, Validate)]
pub struct EditProductForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(length(min = 1, max = TEXT_MAX_LEN_VALIDATOR))]
    pub title: String,
    #[validate(length(max = TEXT_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(max = TEXT_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[validate(length(max = IMAGE_MAX_LEN_VALIDATOR))]
    pub image: String,
    #[serde(default)]
    pub available: bool,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    pub fn into_update_product(self) -> ProductFormResult<EditProductPayload> {
        self.validate()?;

        let fields = ProductFields::sanitize(
            &self.title,
            &self.brand,
            self.description.as_deref(),
            self.slug.as_deref(),
            self.price.as_deref(),
            &self.image,
        )?;

        let update = UpdateProduct {
            category_id: self.category_id,
            title: fields.title,
            brand: fields.brand,
            description: fields.description,
            slug: fields.slug,
            price_cents: fields.price_cents,
            image: fields.image,
            available: self.available,
            updated_at: chrono::Local::now().naive_utc(),
        };

        Ok(EditProductPayload {
            product_id: self.product_id,
            update,
        })
    }
}

struct ProductFields {
    title: String,
    brand: String,
    description: Option<String>,
    slug: String,
    price_cents: i64,
    image: String,
}

impl ProductFields {
    fn sanitize(
        title: &str,
        brand: &str,
        description: Option<&str>,
        slug: Option<&str>,
        price: Option<&str>,
        image: &str,
    ) -> ProductFormResult<Self> {
        let title = sanitize_inline_text(title);
        if title.is_empty() {
            return Err(ProductFormError::EmptyTitle);
        }

        let image = image.trim().to_string();
        if image.is_empty() {
            return Err(ProductFormError::EmptyImage);
        }

        let slug = match slug.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) if is_valid_slug(value) => value.to_string(),
            Some(value) => return Err(ProductFormError::InvalidSlug(value.to_string())),
            None => {
                let derived = slugify(&title);
                if derived.is_empty() {
                    return Err(ProductFormError::InvalidSlug(title));
                }
                derived
            }
        };

        let price_cents = match price.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => parse_price_cents(value)?,
            None => DEFAULT_PRICE_CENTS,
        };

        Ok(Self {
            brand: sanitize_inline_text(brand),
            description: description
                .map(sanitize_multiline_text)
                .filter(|value| !value.is_empty()),
            title,
            slug,
            price_cents,
            image,
        })
    }
}
