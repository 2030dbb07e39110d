use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::price::MAX_PRICE_CENTS;
use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
    ProductWithCategory, UpdateProduct as DomainUpdateProduct,
};
use crate::models::category::Category as DbCategory;
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
};
use crate::repository::category::ensure_category_exists;
use crate::repository::{
    DieselRepository, ProductReader, ProductWriter, RepositoryError, RepositoryResult,
};
use crate::schema::{categories, products};

type BoxedProductQuery<'a> = products::BoxedQuery<'a, Sqlite>;

/// Compile `query` into a boxed statement over `products`.
fn filtered_products(query: &ProductListQuery) -> BoxedProductQuery<'_> {
    let mut items = products::table.into_boxed::<Sqlite>();

    if query.available_only {
        items = items.filter(products::available.eq(true));
    }

    if let Some(category_id) = query.category_id {
        items = items.filter(products::category_id.eq(category_id));
    }

    if let Some(slug) = query.slug.as_deref() {
        items = items.filter(products::slug.eq(slug));
    }

    items.order(products::id.asc())
}

fn ensure_price_in_range(price_cents: i64) -> RepositoryResult<()> {
    if (0..=MAX_PRICE_CENTS).contains(&price_cents) {
        Ok(())
    } else {
        Err(RepositoryError::ConstraintViolation(format!(
            "price of {price_cents} cents is outside 0..={MAX_PRICE_CENTS}"
        )))
    }
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;

        let product = products::table
            .find(id)
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(DomainProduct::from))
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<DomainProduct>> {
        let mut conn = self.conn()?;

        let db_products = filtered_products(&query).load::<DbProduct>(&mut conn)?;

        Ok(db_products.into_iter().map(DomainProduct::from).collect())
    }

    fn list_products_with_category(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<Vec<ProductWithCategory>> {
        let mut conn = self.conn()?;

        let db_products = filtered_products(&query).load::<DbProduct>(&mut conn)?;

        let mut category_ids: Vec<i32> = db_products.iter().map(|p| p.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let db_categories: HashMap<i32, DbCategory> = categories::table
            .filter(categories::id.eq_any(&category_ids))
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(|category| (category.id, category))
            .collect();

        db_products
            .into_iter()
            .map(|product| {
                let category = db_categories.get(&product.category_id).cloned().ok_or_else(|| {
                    RepositoryError::Inconsistent(format!(
                        "product {} references missing category {}",
                        product.id, product.category_id
                    ))
                })?;
                Ok(ProductWithCategory {
                    product: product.into(),
                    category: category.into(),
                })
            })
            .collect()
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        ensure_price_in_range(new_product.price_cents)?;

        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            ensure_category_exists(conn, new_product.category_id)?;

            let db_new = DbNewProduct::from(new_product);

            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .get_result::<DbProduct>(conn)?;

            Ok(created.into())
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        ensure_price_in_range(updates.price_cents)?;

        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            ensure_category_exists(conn, updates.category_id)?;

            let db_updates = DbUpdateProduct::from(updates);

            let updated = diesel::update(products::table.find(product_id))
                .set(&db_updates)
                .get_result::<DbProduct>(conn)?;

            Ok(updated.into())
        })
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(products::table.find(product_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
