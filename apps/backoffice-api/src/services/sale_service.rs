//! # Sale Workflow
//!
//! Records sales against the product catalog.
//!
//! ## Create
//! ```text
//! [{productId, quantity}, ...]
//!      │
//!      ▼
//! snapshot products (pool) ──► plan_sale (pure)
//!      │                         • non-empty, quantities > 0
//!      │                         • product exists, is active
//!      │                         • stock covers the line, earlier lines
//!      │                           of the same product already counted
//!      ▼
//! BEGIN
//!   take_stock per product   ← conditional UPDATE, may lose a race
//!   insert sale + items
//! COMMIT                     ← any failure before this rolls back
//!      │
//!      ▼
//! evict sales + products caches
//! ```
//!
//! ## Update
//! Same as create, except the old items' stock is restored first, both in
//! the snapshot used for planning and in the transaction:
//!
//! ```text
//! BEGIN
//!   touch sale               ← NotFound if deleted meanwhile
//!   return_stock per old item
//!   take_stock per new product
//!   replace items, total, sold_at
//! COMMIT
//! ```
//!
//! Deleting a sale does not give its stock back.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use backoffice_core::{plan_sale, restore_stock, CoreError, Sale, SaleLineRequest, SalePlan};
use backoffice_db::{
    generate_id, Database, DbError, DbTransaction, ProductRepository, SaleRepository,
};

use crate::error::{ApiError, ApiResult};
use crate::state::{CacheName, ListCache};

/// Sale service implementation.
pub struct SaleService {
    db: Database,
    cache: Arc<ListCache>,
}

impl SaleService {
    /// Create a new sale service.
    pub fn new(db: Database, cache: Arc<ListCache>) -> Self {
        SaleService { db, cache }
    }

    /// Validates and records a new sale, taking its stock.
    pub async fn create(&self, lines: Vec<SaleLineRequest>) -> ApiResult<Sale> {
        debug!(lines = lines.len(), "Creating sale");

        let catalog = self.db.products().get_many(&product_ids(&lines)).await?;
        let plan = plan_sale(&lines, &catalog)?;
        debug!(total = %plan.total(), "Sale planned");

        let mut tx = self.db.begin().await?;
        take_planned_stock(&mut tx, &plan).await?;

        let sale = Sale::new(generate_id(), Utc::now(), plan.into_items(generate_id));
        SaleRepository::insert(&mut tx, &sale).await?;
        tx.commit().await.map_err(DbError::from)?;

        self.evict().await;

        info!(id = %sale.id, total = %sale.total(), items = sale.items().len(), "Sale recorded");
        Ok(sale)
    }

    /// Replaces a sale's items, moving stock by the difference.
    pub async fn update(&self, id: &str, lines: Vec<SaleLineRequest>) -> ApiResult<Sale> {
        debug!(id = %id, lines = lines.len(), "Updating sale");

        let mut sale = self.find(id).await?;

        let mut ids = product_ids(&lines);
        for item in sale.items() {
            if !ids.contains(&item.product_id) {
                ids.push(item.product_id.clone());
            }
        }

        let mut catalog = self.db.products().get_many(&ids).await?;
        restore_stock(&mut catalog, sale.items())?;
        let plan = plan_sale(&lines, &catalog)?;
        debug!(id = %id, total = %plan.total(), "Sale replanned");

        let mut tx = self.db.begin().await?;
        SaleRepository::touch(&mut tx, id)
            .await
            .map_err(|e| sale_not_found(e, id))?;

        let held = SaleRepository::items_in(&mut tx, id).await?;
        for item in &held {
            ProductRepository::return_stock(&mut tx, &item.product_id, item.quantity).await?;
        }
        take_planned_stock(&mut tx, &plan).await?;

        sale.replace_items(plan.into_items(generate_id), Utc::now());
        SaleRepository::replace(&mut tx, &sale).await?;
        tx.commit().await.map_err(DbError::from)?;

        self.evict().await;

        info!(id = %sale.id, total = %sale.total(), "Sale updated");
        Ok(sale)
    }

    /// Deletes a sale. Stock is not restored.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.db
            .sales()
            .delete(id)
            .await
            .map_err(|e| sale_not_found(e, id))?;
        self.cache.invalidate(CacheName::Sales).await;

        info!(id = %id, "Sale deleted");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> ApiResult<Sale> {
        self.find(id).await
    }

    /// Every sale with its items, through the sales cache.
    pub async fn list_all(&self) -> ApiResult<Vec<Sale>> {
        let db = &self.db;
        let sales = self
            .cache
            .sales()
            .get_or_load(|| async move { db.sales().list_all().await })
            .await?;

        Ok(sales.as_ref().clone())
    }

    async fn find(&self, id: &str) -> ApiResult<Sale> {
        self.db
            .sales()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()).into())
    }

    /// Sales changed and so did stock.
    async fn evict(&self) {
        self.cache.invalidate(CacheName::Sales).await;
        self.cache.invalidate(CacheName::Products).await;
    }
}

/// Distinct product ids in request order.
fn product_ids(lines: &[SaleLineRequest]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if !ids.contains(&line.product_id) {
            ids.push(line.product_id.clone());
        }
    }
    ids
}

fn sale_not_found(err: DbError, id: &str) -> ApiError {
    match err {
        DbError::NotFound { .. } => CoreError::SaleNotFound(id.to_string()).into(),
        other => other.into(),
    }
}

/// Applies a plan's stock decrements inside `tx`.
///
/// The plan was checked against a snapshot; if another sale took stock in
/// the meantime the conditional decrement refuses and the current state of
/// the product decides the error. The caller drops `tx` on error, rolling
/// back the decrements already applied.
async fn take_planned_stock(tx: &mut DbTransaction, plan: &SalePlan) -> ApiResult<()> {
    for (product_id, quantity) in plan.stock_decrements() {
        if ProductRepository::take_stock(&mut **tx, &product_id, quantity).await? {
            continue;
        }

        warn!(product_id = %product_id, quantity, "Stock changed after planning");

        let err = match ProductRepository::find_in(&mut **tx, &product_id).await? {
            None => CoreError::ProductNotFound(product_id),
            Some(product) if !product.is_active => CoreError::InactiveProduct(product_id),
            Some(product) => CoreError::InsufficientStock {
                product_id,
                available: product.stock_quantity,
                requested: quantity,
            },
        };
        return Err(err.into());
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
