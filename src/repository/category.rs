use std::collections::HashSet;

use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use rand::Rng;

use crate::domain::category::{
    Category as DomainCategory, CategoryListQuery, NewCategory as DomainNewCategory,
    UpdateCategory as DomainUpdateCategory,
};
use crate::domain::slug;
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, UpdateCategory as DbUpdateCategory,
};
use crate::repository::{
    CategoryReader, CategoryWriter, DieselRepository, RepositoryError, RepositoryResult,
};

/// Number of random tokens tried before giving up on a generated slug.
const MAX_SLUG_ATTEMPTS: usize = 8;

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .find(id)
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(DomainCategory::from))
    }

    fn get_category_by_slug(&self, slug: &str) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::slug.eq(slug))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(DomainCategory::from))
    }

    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let mut items = categories::table.into_boxed::<Sqlite>();

        if query.top_level_only {
            items = items.filter(categories::parent_id.is_null());
        }

        let categories = items
            .order(categories::id.asc())
            .load::<DbCategory>(&mut conn)?;

        Ok(categories.into_iter().map(DomainCategory::from).collect())
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(
        &self,
        new_category: &DomainNewCategory,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        // Immediate mode takes the write lock up front, so the slug and name
        // checks below cannot race another writer.
        conn.immediate_transaction::<DomainCategory, RepositoryError, _>(|conn| {
            if let Some(parent_id) = new_category.parent_id {
                ensure_category_exists(conn, parent_id)?;
            }

            ensure_unique_name(conn, &new_category.name, new_category.parent_id, None)?;

            let slug = match new_category.slug.as_deref().filter(|slug| !slug.is_empty()) {
                Some(slug) => slug.to_string(),
                None => generate_unique_slug(conn, &mut rand::rng(), &new_category.name)?,
            };

            let insertable = DbNewCategory {
                parent_id: new_category.parent_id,
                name: new_category.name.as_str(),
                slug: slug.as_str(),
            };

            let created = diesel::insert_into(categories::table)
                .values(&insertable)
                .get_result::<DbCategory>(conn)?;

            Ok(created.into())
        })
    }

    fn update_category(
        &self,
        category_id: i32,
        updates: &DomainUpdateCategory,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<DomainCategory, RepositoryError, _>(|conn| {
            ensure_category_exists(conn, category_id)?;

            if let Some(parent_id) = updates.parent_id {
                ensure_category_exists(conn, parent_id)?;
                ensure_not_descendant(conn, category_id, parent_id)?;
            }

            ensure_unique_name(conn, &updates.name, updates.parent_id, Some(category_id))?;

            let mut db_updates = DbUpdateCategory::from(updates);
            if db_updates.slug.is_some_and(str::is_empty) {
                db_updates.slug = None;
            }

            let updated = diesel::update(categories::table.find(category_id))
                .set(&db_updates)
                .get_result::<DbCategory>(conn)?;

            Ok(updated.into())
        })
    }

    fn delete_category(&self, category_id: i32) -> RepositoryResult<()> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        conn.immediate_transaction::<(), RepositoryError, _>(|conn| {
            ensure_category_exists(conn, category_id)?;

            let subtree = collect_subtree_ids(conn, category_id)?;

            let removed_products =
                diesel::delete(products::table.filter(products::category_id.eq_any(&subtree)))
                    .execute(conn)?;
            let removed_categories =
                diesel::delete(categories::table.filter(categories::id.eq_any(&subtree)))
                    .execute(conn)?;

            log::info!(
                "Deleted category {category_id}: {removed_categories} categories and {removed_products} products removed"
            );

            Ok(())
        })
    }
}

/// Fails with [`RepositoryError::NotFound`] unless category `category_id` exists.
pub(crate) fn ensure_category_exists(
    conn: &mut SqliteConnection,
    category_id: i32,
) -> RepositoryResult<()> {
    use crate::schema::categories;

    let exists = select(exists(categories::table.find(category_id))).get_result(conn)?;

    if exists {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}

fn ensure_unique_name(
    conn: &mut SqliteConnection,
    name: &str,
    parent_id: Option<i32>,
    exclude_id: Option<i32>,
) -> RepositoryResult<()> {
    use crate::schema::categories;

    let mut query = categories::table
        .filter(categories::name.eq(name))
        .into_boxed::<Sqlite>();

    query = match parent_id {
        Some(parent_id) => query.filter(categories::parent_id.eq(parent_id)),
        None => query.filter(categories::parent_id.is_null()),
    };

    if let Some(exclude_id) = exclude_id {
        query = query.filter(categories::id.ne(exclude_id));
    }

    let duplicates = query.count().get_result::<i64>(conn)?;

    if duplicates > 0 {
        return Err(RepositoryError::ConstraintViolation(format!(
            "category `{name}` already exists under the same parent"
        )));
    }

    Ok(())
}

/// Draws up to [`MAX_SLUG_ATTEMPTS`] slugs from `rng` and returns the first free one.
fn generate_unique_slug<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    rng: &mut R,
    name: &str,
) -> RepositoryResult<String> {
    use crate::schema::categories;

    for attempt in 1..=MAX_SLUG_ATTEMPTS {
        let candidate = slug::category_slug(rng, name);

        let taken = categories::table
            .filter(categories::slug.eq(&candidate))
            .count()
            .get_result::<i64>(conn)?;

        if taken == 0 {
            return Ok(candidate);
        }

        log::warn!(
            "Generated category slug `{candidate}` is taken (attempt {attempt}/{MAX_SLUG_ATTEMPTS})"
        );
    }

    Err(RepositoryError::ConstraintViolation(format!(
        "could not generate a unique slug for category `{name}`"
    )))
}

/// Rejects moving `category_id` under `new_parent_id` when that would close a cycle.
fn ensure_not_descendant(
    conn: &mut SqliteConnection,
    category_id: i32,
    new_parent_id: i32,
) -> RepositoryResult<()> {
    use crate::schema::categories;

    let mut visited = HashSet::new();
    let mut current = Some(new_parent_id);

    while let Some(id) = current {
        if id == category_id {
            return Err(RepositoryError::ConstraintViolation(format!(
                "category {category_id} cannot be moved under its own descendant {new_parent_id}"
            )));
        }
        if !visited.insert(id) {
            return Err(RepositoryError::Inconsistent(format!(
                "category {id} is part of a parent cycle"
            )));
        }

        current = categories::table
            .find(id)
            .select(categories::parent_id)
            .first::<Option<i32>>(conn)
            .optional()?
            .flatten();
    }

    Ok(())
}

fn collect_subtree_ids(conn: &mut SqliteConnection, root_id: i32) -> RepositoryResult<Vec<i32>> {
    use crate::schema::categories;

    let mut visited = HashSet::from([root_id]);
    let mut subtree = vec![root_id];
    let mut frontier = vec![root_id];

    while !frontier.is_empty() {
        let children = categories::table
            .filter(categories::parent_id.eq_any(&frontier))
            .select(categories::id)
            .load::<i32>(conn)?;

        frontier = children
            .into_iter()
            .filter(|id| visited.insert(*id))
            .collect();
        subtree.extend(&frontier);
    }

    Ok(subtree)
}
