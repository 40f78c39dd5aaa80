//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD and soft delete (deactivation)
//! - Batch lookup for sale planning
//! - Atomic conditional stock updates
//!
//! ## Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, check in Rust, write absolute value                   │
//! │     SELECT stock_quantity ...  → 7                                     │
//! │     UPDATE products SET stock_quantity = 4 ...                         │
//! │     (two concurrent sales both read 7 and both succeed)                │
//! │                                                                         │
//! │  ✅ CORRECT: one statement that checks and subtracts                   │
//! │     UPDATE products SET stock_quantity = stock_quantity - 3            │
//! │     WHERE id = ? AND is_active = 1 AND stock_quantity >= 3             │
//! │                                                                         │
//! │  rows_affected = 1 → taken                                             │
//! │  rows_affected = 0 → unknown, inactive or short: caller re-reads       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use backoffice_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list_all().await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, active or not, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, stock_quantity,
                   is_active, created_at, updated_at
            FROM products
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Lists active products only.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, stock_quantity,
                   is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, stock_quantity,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Loads the given products keyed by id. Unknown ids are simply absent.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<HashMap<String, Product>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, name, description, price_cents, stock_quantity, \
             is_active, created_at, updated_at FROM products WHERE id IN (",
        );
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        debug!(requested = ids.len(), found = products.len(), "Loaded product snapshot");
        Ok(products.into_iter().map(|p| (p.id.clone(), p)).collect())
    }

    /// Inserts a new product.
    ///
    /// The id should be generated beforehand (see [`super::generate_id`]).
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, stock_quantity,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Overwrites every mutable column of an existing product.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                stock_quantity = ?5,
                is_active = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(product.is_active)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Past sales keep referencing the row, so it is never removed.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    // =========================================================================
    // Transactional operations
    // =========================================================================

    /// Reads a product on the given connection (usually an open transaction).
    pub async fn find_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, stock_quantity,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Takes `quantity` units if the product is active and has enough stock.
    ///
    /// ## Returns
    /// * `Ok(true)` - Stock decremented
    /// * `Ok(false)` - Nothing changed: the product is unknown, inactive or short
    pub async fn take_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<bool> {
        debug!(id = %id, quantity, "Taking stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - ?2,
                updated_at = ?3
            WHERE id = ?1
              AND is_active = 1
              AND stock_quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Puts `quantity` units back, whatever the product's active flag.
    pub async fn return_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<()> {
        debug!(id = %id, quantity, "Returning stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
