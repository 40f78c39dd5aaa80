//! # Application State
//!
//! Everything a handler needs, shared across requests.
//!
//! ```text
//! AppState (Clone)
//! ├── db: Database            pool handle, cheap to clone
//! └── cache: Arc<ListCache>   one per process
//!
//! state.catalog()  → CatalogService
//! state.sales()    → SaleService
//! state.reports()  → ReportService
//! ```

mod cache;

pub use cache::{CacheName, CachedList, ListCache};

use std::sync::Arc;

use backoffice_db::Database;

use crate::services::{CatalogService, ReportService, SaleService};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub cache: Arc<ListCache>,
}

impl AppState {
    /// Wraps a database with a fresh, empty cache.
    pub fn new(db: Database) -> Self {
        AppState {
            db,
            cache: Arc::new(ListCache::new()),
        }
    }

    /// Returns the product catalog service.
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.db.clone(), Arc::clone(&self.cache))
    }

    /// Returns the sale workflow service.
    pub fn sales(&self) -> SaleService {
        SaleService::new(self.db.clone(), Arc::clone(&self.cache))
    }

    /// Returns the report service.
    pub fn reports(&self) -> ReportService {
        ReportService::new(self.db.clone())
    }
}
