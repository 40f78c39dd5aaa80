//! # Repository Module
//!
//! Database repository implementations for the back office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service                                                               │
//! │       │  db.products().get_by_id(id)                                   │
//! │       ▼                                                                 │
//! │  ProductRepository / SaleRepository      (pool-backed reads, CRUD)     │
//! │       │                                                                 │
//! │       │  ProductRepository::take_stock(&mut *tx, ...)                  │
//! │       ▼                                                                 │
//! │  Associated fns on &mut SqliteConnection (run inside a transaction)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and atomic stock updates
//! - [`sale::SaleRepository`] - Sales with their items, range queries

use uuid::Uuid;

pub mod product;
pub mod sale;

/// Generates a new entity ID (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
