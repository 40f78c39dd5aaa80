//! # Back Office API
//!
//! HTTP server for the product catalog, sales and sales reports.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Back Office API                                 │
//! │                                                                         │
//! │  HTTP ──► routes ──► services ──────────────► backoffice-db ──► SQLite │
//! │                        │   CatalogService        (repositories,        │
//! │                        │   SaleService            transactions)        │
//! │                        │   ReportService                               │
//! │                        │                                                │
//! │                        ├──► backoffice-core (validation, sale planning,│
//! │                        │                     report ranges)            │
//! │                        └──► ListCache (products, sales)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (or the same keys in `backoffice.toml`):
//! - `BACKOFFICE_HOST` - Interface to bind (default: 0.0.0.0)
//! - `BACKOFFICE_PORT` - HTTP port (default: 8080)
//! - `BACKOFFICE_DATABASE_PATH` - SQLite file (default: backoffice.db)
//! - `BACKOFFICE_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `BACKOFFICE_LOG_FILTER` - Log filter when `RUST_LOG` is unset

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;
pub use state::AppState;
