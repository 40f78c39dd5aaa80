//! Errors raised by the business rules.
//!
//! ```text
//! ValidationError ──(From)──► CoreError ──(From)──► ApiError (apps/backoffice-api)
//!                                                      ▲
//!                                   DbError ───(From)──┘  (backoffice-db)
//! ```
//!
//! Nothing in this crate knows about HTTP. The API decides the status code;
//! `is_not_found` is the only classification it needs from us.

use thiserror::Error;

/// A rule of the back office was broken, or an id pointed nowhere.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    #[error("A sale must have at least one item")]
    EmptySale,

    /// The product is still on file but `is_active` is false.
    #[error("Inactive product: {0}")]
    InactiveProduct(String),

    /// `requested` is the sum over every line naming the product, not one line.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Unknown product or sale id. Everything else is the caller's input.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ProductNotFound(_) | CoreError::SaleNotFound(_)
        )
    }
}

/// A single field failed its check. `field` is the name the client sent.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Dates and months that do not exist on the calendar.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
