//! Product catalog service.
//!
//! CRUD over products. Every write evicts the products cache; the two list
//! operations read through it.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use backoffice_core::validation::{validate_new_product, validate_product_update};
use backoffice_core::{CoreError, Product, ProductInput};
use backoffice_db::{generate_id, Database, DbError};

use crate::error::{ApiError, ApiResult};
use crate::state::{CacheName, ListCache};

/// Catalog service implementation.
pub struct CatalogService {
    db: Database,
    cache: Arc<ListCache>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(db: Database, cache: Arc<ListCache>) -> Self {
        CatalogService { db, cache }
    }

    /// Creates a product. The price must be strictly positive.
    pub async fn create(&self, input: ProductInput) -> ApiResult<Product> {
        validate_new_product(&input)?;

        let product = Product::from_input(generate_id(), input, Utc::now());
        let product = self.db.products().insert(&product).await?;
        self.cache.invalidate(CacheName::Products).await;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Overwrites every editable field of a product.
    pub async fn update(&self, id: &str, input: ProductInput) -> ApiResult<Product> {
        validate_product_update(&input)?;

        let mut product = self.find(id).await?;
        product.apply(input, Utc::now());

        self.db.products().update(&product).await?;
        self.cache.invalidate(CacheName::Products).await;

        info!(id = %product.id, "Product updated");
        Ok(product)
    }

    /// Soft-deletes a product.
    pub async fn deactivate(&self, id: &str) -> ApiResult<()> {
        self.db
            .products()
            .deactivate(id)
            .await
            .map_err(|e| match e {
                DbError::NotFound { .. } => CoreError::ProductNotFound(id.to_string()).into(),
                other => ApiError::from(other),
            })?;
        self.cache.invalidate(CacheName::Products).await;

        info!(id = %id, "Product deactivated");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> ApiResult<Product> {
        self.find(id).await
    }

    /// Every product, active or not.
    pub async fn list_all(&self) -> ApiResult<Vec<Product>> {
        let db = &self.db;
        let products = self
            .cache
            .products()
            .get_or_load(|| async move { db.products().list_all().await })
            .await?;

        Ok(products.as_ref().clone())
    }

    /// Active products, filtered from the cached full list.
    pub async fn list_active(&self) -> ApiResult<Vec<Product>> {
        let active: Vec<Product> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|p| p.is_active)
            .collect();

        debug!(count = active.len(), "Listing active products");
        Ok(active)
    }

    async fn find(&self, id: &str) -> ApiResult<Product> {
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use backoffice_db::DbConfig;

    async fn service() -> CatalogService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CatalogService::new(db, Arc::new(ListCache::new()))
    }

    fn input(name: &str, price_cents: i64, stock_quantity: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: format!("{name} description"),
            price_cents,
            stock_quantity,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_requires_positive_price() {
        let catalog = service().await;

        let zero = catalog.create(input("Free", 0, 1)).await.unwrap_err();
        assert_eq!(zero.code, ErrorCode::ValidationError);

        let negative = catalog.create(input("Owed", -5, 1)).await.unwrap_err();
        assert_eq!(negative.code, ErrorCode::ValidationError);

        let ok = catalog.create(input("Pen", 1, 1)).await.unwrap();
        assert_eq!(ok.price_cents, 1);
        assert!(ok.is_active);
    }

    #[tokio::test]
    async fn test_update_allows_zero_price() {
        let catalog = service().await;
        let pen = catalog.create(input("Pen", 150, 3)).await.unwrap();

        let updated = catalog.update(&pen.id, input("Pen v2", 0, 9)).await.unwrap();

        assert_eq!(updated.name, "Pen v2");
        assert_eq!(updated.price_cents, 0);
        assert_eq!(catalog.get(&pen.id).await.unwrap().stock_quantity, 9);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let catalog = service().await;

        assert_eq!(catalog.get("nope").await.unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(
            catalog.update("nope", input("X", 1, 1)).await.unwrap_err().code,
            ErrorCode::NotFound
        );
        assert_eq!(catalog.deactivate("nope").await.unwrap_err().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_active_list_only() {
        let catalog = service().await;
        let pen = catalog.create(input("Pen", 150, 3)).await.unwrap();
        catalog.create(input("Ink", 300, 3)).await.unwrap();

        // Populate the cache first so the write must evict it.
        assert_eq!(catalog.list_active().await.unwrap().len(), 2);

        catalog.deactivate(&pen.id).await.unwrap();

        let all = catalog.list_all().await.unwrap();
        let active = catalog.list_active().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Ink");
    }

    #[tokio::test]
    async fn test_list_all_reflects_writes() {
        let catalog = service().await;
        assert!(catalog.list_all().await.unwrap().is_empty());

        catalog.create(input("Pen", 150, 3)).await.unwrap();

        assert_eq!(catalog.list_all().await.unwrap().len(), 1);
    }
}
