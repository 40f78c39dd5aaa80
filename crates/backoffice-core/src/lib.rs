//! Domain model and business rules of the back office.
//!
//! Everything here is synchronous and side-effect free. The database crate
//! loads rows, this crate decides what a sale does to them, and the API
//! crate writes the outcome back inside one transaction.
//!
//! ```text
//! apps/backoffice-api ──► backoffice-core ◄── backoffice-db
//!   handlers, services       types, money       repositories
//!                            plan_sale          migrations
//!                            DateRange
//! ```
//!
//! Amounts are integer cents ([`Money`]); a total is always the exact sum of
//! its lines.
//!
//! ```rust
//! use backoffice_core::money::Money;
//!
//! let line_total = Money::from_cents(500).multiply_quantity(3);
//! assert_eq!(line_total.cents(), 1500);
//! ```

pub mod error;
pub mod money;
pub mod report;
pub mod sale_plan;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::DateRange;
pub use sale_plan::{plan_sale, restore_stock, PlannedLine, SalePlan};
pub use types::*;

/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Maximum length of a product name.
pub const MAX_NAME_LEN: usize = 200;
