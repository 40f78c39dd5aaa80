//! SQLite persistence for products and sales (sqlx, runtime-checked queries).
//!
//! ```text
//! Database ──┬── products() ─► ProductRepository   pooled reads, plain writes
//!            ├── sales() ────► SaleRepository
//!            └── begin() ────► DbTransaction ─► find_in, take_stock, insert, replace
//! ```
//!
//! Associated functions without `&self` take a `&mut SqliteConnection` so
//! the sale workflow can run them on its transaction. Methods use the pool.
//!
//! ```rust,ignore
//! let db = Database::new(DbConfig::new("backoffice.db")).await?;
//! let active = db.products().list_active().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbTransaction};

pub use repository::generate_id;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
