//! Helpers for integration tests.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use pushkind_shop::db::{DbPool, establish_connection_pool};
use pushkind_shop::domain::category::{Category, NewCategory};
use pushkind_shop::domain::product::{NewProduct, Product};
use pushkind_shop::repository::{CategoryWriter, DieselRepository, ProductWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    #[allow(dead_code)]
    pub fn repository(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

#[allow(dead_code)]
pub fn create_category(repo: &DieselRepository, name: &str, parent_id: Option<i32>) -> Category {
    let mut new_category = NewCategory::new(name);
    if let Some(parent_id) = parent_id {
        new_category = new_category.with_parent_id(parent_id);
    }
    repo.create_category(&new_category)
        .expect("Failed to create category")
}

#[allow(dead_code)]
pub fn create_product(repo: &DieselRepository, category_id: i32, title: &str) -> Product {
    let slug = pushkind_shop::domain::slug::slugify(title);
    repo.create_product(&NewProduct::new(
        category_id,
        title,
        "",
        "products/products/2024/01/01/p.gif",
        slug,
    ))
    .expect("Failed to create product")
}
