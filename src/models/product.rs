use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::products,
    belongs_to(super::category::Category, foreign_key = category_id)
)]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub title: String,
    pub brand: String,
    pub description: Option<String>,
    pub slug: String,
    pub price_cents: i64,
    pub image: String,
    pub available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub category_id: i32,
    pub title: &'a str,
    pub brand: &'a str,
    pub description: Option<&'a str>,
    pub slug: &'a str,
    pub price_cents: i64,
    pub image: &'a str,
    pub available: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub category_id: i32,
    pub title: &'a str,
    pub brand: &'a str,
    pub description: Option<&'a str>,
    pub slug: &'a str,
    pub price_cents: i64,
    pub image: &'a str,
    pub available: bool,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            category_id: value.category_id,
            title: value.title,
            brand: value.brand,
            description: value.description,
            slug: value.slug,
            price_cents: value.price_cents,
            image: value.image,
            available: value.available,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            category_id: value.category_id,
            title: value.title.as_str(),
            brand: value.brand.as_str(),
            description: value.description.as_deref(),
            slug: value.slug.as_str(),
            price_cents: value.price_cents,
            image: value.image.as_str(),
            available: value.available,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            category_id: value.category_id,
            title: value.title.as_str(),
            brand: value.brand.as_str(),
            description: value.description.as_deref(),
            slug: value.slug.as_str(),
            price_cents: value.price_cents,
            image: value.image.as_str(),
            available: value.available,
            updated_at: value.updated_at,
        }
    }
}
