//! Service implementations.
//!
//! Services hold the workflow logic between the HTTP handlers and the
//! repositories: transactions, cache eviction and error translation.

pub mod catalog_service;
pub mod report_service;
pub mod sale_service;

pub use catalog_service::CatalogService;
pub use report_service::ReportService;
pub use sale_service::SaleService;
