//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (inside the stock transaction)                              │
//! │     └── insert() → sales row + sale_items rows                         │
//! │                                                                         │
//! │  2. UPDATE (inside the stock transaction)                              │
//! │     └── touch()     → lock the row, fail if the sale is gone           │
//! │     └── items_in()  → items whose stock gets returned                  │
//! │     └── replace()   → new items, new total, sold_at refreshed          │
//! │                                                                         │
//! │  3. DELETE                                                             │
//! │     └── delete() → items and sale removed, stock untouched             │
//! │                                                                         │
//! │  READ: get_by_id(), list_all(), list_between() for reports             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use backoffice_core::{Sale, SaleItem};

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    sold_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    sale_id: String,
    #[sqlx(flatten)]
    item: SaleItem,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale with its items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>("SELECT id, sold_at FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut conn = self.pool.acquire().await?;
        let items = Self::items_in(&mut conn, id).await?;
        Ok(Some(Sale::new(row.id, row.sold_at, items)))
    }

    /// Lists every sale, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            "SELECT id, sold_at FROM sales ORDER BY sold_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT sale_id, id, product_id, name_snapshot AS product_name,
                   unit_price_cents, quantity, line_total_cents
            FROM sale_items
            ORDER BY sale_id, line_no
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed sales");
        Ok(assemble(rows, items))
    }

    /// Sales with `start <= sold_at < end_before`, oldest first.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end_before: DateTime<Utc>,
    ) -> DbResult<Vec<Sale>> {
        debug!(%start, %end_before, "Querying sales in range");

        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, sold_at FROM sales
            WHERE sold_at >= ?1 AND sold_at < ?2
            ORDER BY sold_at, id
            "#,
        )
        .bind(start)
        .bind(end_before)
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT i.sale_id, i.id, i.product_id, i.name_snapshot AS product_name,
                   i.unit_price_cents, i.quantity, i.line_total_cents
            FROM sale_items i
            INNER JOIN sales s ON s.id = i.sale_id
            WHERE s.sold_at >= ?1 AND s.sold_at < ?2
            ORDER BY i.sale_id, i.line_no
            "#,
        )
        .bind(start)
        .bind(end_before)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble(rows, items))
    }

    /// Deletes a sale and its items.
    ///
    /// Stock taken by the sale is not given back.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sale");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    // Transactional operations
    // =========================================================================

    /// Inserts a sale and its items.
    pub async fn insert(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, total = %sale.total(), "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, total_cents, sold_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.total_cents())
        .bind(sale.sold_at)
        .execute(&mut *conn)
        .await?;

        insert_items(conn, &sale.id, sale.items()).await
    }

    /// Write-locks a sale row for the rest of the transaction.
    ///
    /// Fails with NotFound when the sale does not exist.
    pub async fn touch(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE sales SET updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Items of a sale in line order.
    pub async fn items_in(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, product_id, name_snapshot AS product_name,
                   unit_price_cents, quantity, line_total_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY line_no
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(items)
    }

    /// Replaces a sale's items, total and timestamp with `sale`'s.
    pub async fn replace(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, total = %sale.total(), "Replacing sale items");

        let result = sqlx::query(
            r#"
            UPDATE sales
            SET total_cents = ?2, sold_at = ?3, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(&sale.id)
        .bind(sale.total_cents())
        .bind(sale.sold_at)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", &sale.id));
        }

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(&sale.id)
            .execute(&mut *conn)
            .await?;

        insert_items(conn, &sale.id, sale.items()).await
    }
}

async fn insert_items(conn: &mut SqliteConnection, sale_id: &str, items: &[SaleItem]) -> DbResult<()> {
    for (line_no, item) in items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, product_id, line_no, name_snapshot,
                unit_price_cents, quantity, line_total_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&item.id)
        .bind(sale_id)
        .bind(&item.product_id)
        .bind(line_no as i64)
        .bind(&item.product_name)
        .bind(item.unit_price_cents)
        .bind(item.quantity)
        .bind(item.line_total_cents)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Groups item rows under their sale, keeping the order of `rows`.
fn assemble(rows: Vec<SaleRow>, items: Vec<ItemRow>) -> Vec<Sale> {
    let mut by_sale: HashMap<String, Vec<SaleItem>> = HashMap::new();
    for row in items {
        by_sale.entry(row.sale_id).or_default().push(row.item);
    }

    rows.into_iter()
        .map(|row| {
            let items = by_sale.remove(&row.id).unwrap_or_default();
            Sale::new(row.id, row.sold_at, items)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::generate_id;
    use crate::repository::product::ProductRepository;
    use crate::{Database, DbConfig};
    use backoffice_core::{Product, ProductInput};
    use chrono::TimeZone;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database) -> Product {
        let product = Product::from_input(
            generate_id(),
            ProductInput {
                name: "Widget".to_string(),
                description: "A widget".to_string(),
                price_cents: 250,
                stock_quantity: 100,
                is_active: true,
            },
            Utc::now(),
        );
        db.products().insert(&product).await.unwrap()
    }

    fn item(product: &Product, quantity: i64) -> SaleItem {
        SaleItem {
            id: generate_id(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            line_total_cents: product.price_cents * quantity,
        }
    }

    async fn store(db: &Database, sale: &Sale) {
        let mut tx = db.begin().await.unwrap();
        SaleRepository::insert(&mut tx, sale).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = test_db().await;
        let product = seed_product(&db).await;
        let sale = Sale::new(
            generate_id(),
            Utc::now(),
            vec![item(&product, 2), item(&product, 1)],
        );
        store(&db, &sale).await;

        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.items(), sale.items());
        assert_eq!(loaded.total_cents(), 750);
        assert!(db.sales().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_between_is_half_open() {
        let db = test_db().await;
        let product = seed_product(&db).await;

        let march_1 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let march_3_late = Utc.with_ymd_and_hms(2024, 3, 3, 23, 59, 59).unwrap();
        let march_4 = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();

        for at in [march_4, march_1, march_3_late] {
            store(&db, &Sale::new(generate_id(), at, vec![item(&product, 1)])).await;
        }

        let found = db.sales().list_between(march_1, march_4).await.unwrap();
        let times: Vec<_> = found.iter().map(|s| s.sold_at).collect();
        assert_eq!(times, vec![march_1, march_3_late]);
        assert!(found.iter().all(|s| s.items().len() == 1));
    }

    #[tokio::test]
    async fn test_replace_swaps_items_and_total() {
        let db = test_db().await;
        let product = seed_product(&db).await;
        let mut sale = Sale::new(generate_id(), Utc::now(), vec![item(&product, 4)]);
        store(&db, &sale).await;

        sale.replace_items(vec![item(&product, 1)], Utc::now());
        let mut tx = db.begin().await.unwrap();
        SaleRepository::touch(&mut tx, &sale.id).await.unwrap();
        assert_eq!(SaleRepository::items_in(&mut tx, &sale.id).await.unwrap().len(), 1);
        SaleRepository::replace(&mut tx, &sale).await.unwrap();
        tx.commit().await.unwrap();

        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.total_cents(), 250);
        assert_eq!(loaded.items()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_delete_keeps_stock() {
        let db = test_db().await;
        let product = seed_product(&db).await;

        let mut tx = db.begin().await.unwrap();
        assert!(ProductRepository::take_stock(&mut tx, &product.id, 5).await.unwrap());
        let sale = Sale::new(generate_id(), Utc::now(), vec![item(&product, 5)]);
        SaleRepository::insert(&mut tx, &sale).await.unwrap();
        tx.commit().await.unwrap();

        db.sales().delete(&sale.id).await.unwrap();

        assert!(db.sales().get_by_id(&sale.id).await.unwrap().is_none());
        assert!(db.sales().list_all().await.unwrap().is_empty());
        let stock = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stock.stock_quantity, 95);

        assert!(matches!(
            db.sales().delete(&sale.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_touch_missing_sale_is_not_found() {
        let db = test_db().await;
        let mut tx = db.begin().await.unwrap();
        assert!(matches!(
            SaleRepository::touch(&mut tx, "missing").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
