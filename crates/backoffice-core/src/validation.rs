//! # Validation Module
//!
//! Input validation for product and sale requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json/Query)                             │
//! │  └── Shape and type checks (deserialization)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Field rules: blank names, lengths, price and quantity ranges      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock_quantity >= 0), CHECK (quantity > 0)                 │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use backoffice_core::validation::{validate_product_name, validate_quantity};
//!
//! validate_product_name("Notebook").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::ProductInput;
use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use backoffice_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Coffee 500g").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validates a product description: non-blank, at most 255 characters.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    validate_text("description", description, MAX_DESCRIPTION_LEN)
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    // Characters, not bytes: descriptions are often accented.
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale line quantity.
///
/// ## User Workflow
/// ```text
/// POST /vendas [{ productId, quantity: 0 }]
///      │
///      ▼
/// validate_quantity(0) ← THIS FUNCTION
///      │
///      ├── qty <= 0? → 400 "quantity must be positive"
///      │
///      └── OK → stock checks in plan_sale
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a stored price in cents.
///
/// ## Example
/// ```rust
/// use backoffice_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "priceCents".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the price of a product being created. Zero is rejected.
pub fn validate_new_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "priceCents".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock quantity (zero allowed).
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stockQuantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates the body of a product creation.
pub fn validate_new_product(input: &ProductInput) -> ValidationResult<()> {
    validate_product_name(&input.name)?;
    validate_description(&input.description)?;
    validate_new_price_cents(input.price_cents)?;
    validate_stock_quantity(input.stock_quantity)
}

/// Validates the body of a product update.
///
/// Same as creation except that a zero price is accepted.
pub fn validate_product_update(input: &ProductInput) -> ValidationResult<()> {
    validate_product_name(&input.name)?;
    validate_description(&input.description)?;
    validate_price_cents(input.price_cents)?;
    validate_stock_quantity(input.stock_quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================
