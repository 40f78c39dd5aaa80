//! # List Cache
//!
//! Memoizes the two "list everything" queries.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ListCache                                                             │
//! │  ├── products: CachedList<Product>   GET /produtos, /produtos/ativos   │
//! │  └── sales:    CachedList<Sale>      GET /vendas                       │
//! │                                                                         │
//! │  Each slot: { generation, value: Option<Arc<Vec<T>>> }                 │
//! │                                                                         │
//! │  get_or_load:                                                          │
//! │    hit  → clone the Arc                                                │
//! │    miss → remember generation, run loader without holding the lock,   │
//! │           store only if generation is unchanged                        │
//! │                                                                         │
//! │  invalidate: generation += 1, value = None                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The generation check keeps a load that started before a write from
//! putting pre-write data back after the write invalidated the slot.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use backoffice_core::{Product, Sale};

/// The named caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheName {
    Products,
    Sales,
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheName::Products => write!(f, "products"),
            CacheName::Sales => write!(f, "sales"),
        }
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    value: Option<Arc<Vec<T>>>,
}

/// One cached list.
#[derive(Debug)]
pub struct CachedList<T> {
    name: CacheName,
    slot: RwLock<Slot<T>>,
}

impl<T> CachedList<T> {
    fn new(name: CacheName) -> Self {
        CachedList {
            name,
            slot: RwLock::new(Slot {
                generation: 0,
                value: None,
            }),
        }
    }

    /// Returns the cached list, running `load` on a miss.
    ///
    /// A failed load leaves the slot empty.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<Arc<Vec<T>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        let generation = {
            let slot = self.slot.read().await;
            if let Some(value) = &slot.value {
                debug!(cache = %self.name, "Cache hit");
                return Ok(Arc::clone(value));
            }
            slot.generation
        };

        debug!(cache = %self.name, "Cache miss");
        let loaded = Arc::new(load().await?);

        let mut slot = self.slot.write().await;
        if slot.generation == generation {
            slot.value = Some(Arc::clone(&loaded));
        } else {
            debug!(cache = %self.name, "Discarding load that raced an invalidation");
        }

        Ok(loaded)
    }

    /// Drops the cached list.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        slot.generation += 1;
        slot.value = None;
        debug!(cache = %self.name, "Cache invalidated");
    }

    /// Returns true if a list is currently cached.
    #[cfg(test)]
    pub async fn is_cached(&self) -> bool {
        self.slot.read().await.value.is_some()
    }
}

/// The two list caches, owned by the application state.
#[derive(Debug)]
pub struct ListCache {
    products: CachedList<Product>,
    sales: CachedList<Sale>,
}

impl ListCache {
    pub fn new() -> Self {
        ListCache {
            products: CachedList::new(CacheName::Products),
            sales: CachedList::new(CacheName::Sales),
        }
    }

    pub fn products(&self) -> &CachedList<Product> {
        &self.products
    }

    pub fn sales(&self) -> &CachedList<Sale> {
        &self.sales
    }

    /// Evicts one named cache.
    pub async fn invalidate(&self, name: CacheName) {
        match name {
            CacheName::Products => self.products.invalidate().await,
            CacheName::Sales => self.sales.invalidate().await,
        }
    }
}

impl Default for ListCache {
    fn default() -> Self {
        ListCache::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
