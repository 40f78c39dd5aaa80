//! # Sale Planning
//!
//! Validates a sale request against a snapshot of the catalog and computes
//! what the sale will record, without touching storage.
//!
//! ## Where Planning Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /vendas [{productId, quantity}, ...]                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load catalog snapshot (db)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  plan_sale(lines, catalog) ← THIS MODULE (pure)                        │
//! │       │   ├── empty?            → EmptySale                            │
//! │       │   ├── quantity <= 0?    → Validation                           │
//! │       │   ├── unknown product?  → ProductNotFound                      │
//! │       │   ├── inactive?         → InactiveProduct                      │
//! │       │   ├── over stock?       → InsufficientStock                    │
//! │       │   └── total > i64?      → Validation (totalCents)              │
//! │       ▼                                                                 │
//! │  SalePlan { lines, total }                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  one transaction: conditional decrements + insert sale (db)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are checked in request order against a working copy of the stock,
//! so two lines for the same product compound against the shared quantity.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, SaleItem, SaleLineRequest};
use crate::validation::validate_quantity;

// =============================================================================
// Plan Types
// =============================================================================

/// One accepted line, bound to the product it was resolved against.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLine {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl PlannedLine {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The outcome of a successful plan: accepted lines plus their total.
#[derive(Debug, Clone, PartialEq)]
pub struct SalePlan {
    lines: Vec<PlannedLine>,
    total: Money,
}

impl SalePlan {
    #[cfg(test)]
    pub fn lines(&self) -> &[PlannedLine] {
        &self.lines
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Quantity to take from each product, summed per product.
    ///
    /// Products appear in the order they were first requested, which keeps
    /// the order of database writes deterministic.
    pub fn stock_decrements(&self) -> Vec<(String, i64)> {
        let mut out: Vec<(String, i64)> = Vec::new();
        for line in &self.lines {
            match out.iter_mut().find(|(id, _)| *id == line.product_id) {
                Some((_, qty)) => *qty += line.quantity,
                None => out.push((line.product_id.clone(), line.quantity)),
            }
        }
        out
    }

    /// Converts the plan into sale items, asking `new_id` for each item id.
    pub fn into_items(self, mut new_id: impl FnMut() -> String) -> Vec<SaleItem> {
        self.lines
            .into_iter()
            .map(|line| SaleItem {
                id: new_id(),
                line_total_cents: line.line_total().cents(),
                product_id: line.product_id,
                product_name: line.product_name,
                unit_price_cents: line.unit_price.cents(),
                quantity: line.quantity,
            })
            .collect()
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Checks every requested line against `catalog` and prices the sale.
///
/// `catalog` only needs the products the request mentions; anything missing
/// from it is reported as not found.
pub fn plan_sale(
    lines: &[SaleLineRequest],
    catalog: &HashMap<String, Product>,
) -> CoreResult<SalePlan> {
    if lines.is_empty() {
        return Err(CoreError::EmptySale);
    }

    let mut remaining: HashMap<&str, i64> = HashMap::new();
    let mut planned = Vec::with_capacity(lines.len());
    let mut total = Money::zero();

    for line in lines {
        validate_quantity(line.quantity)?;

        let product = catalog
            .get(&line.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        if !product.is_active {
            return Err(CoreError::InactiveProduct(product.id.clone()));
        }

        let available = remaining
            .entry(product.id.as_str())
            .or_insert(product.stock_quantity);
        if line.quantity > *available {
            return Err(CoreError::InsufficientStock {
                product_id: product.id.clone(),
                available: *available,
                requested: line.quantity,
            });
        }
        *available -= line.quantity;

        total = product
            .price()
            .checked_multiply_quantity(line.quantity)
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or_else(total_out_of_range)?;

        planned.push(PlannedLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price: product.price(),
            quantity: line.quantity,
        });
    }

    Ok(SalePlan {
        lines: planned,
        total,
    })
}

fn total_out_of_range() -> CoreError {
    ValidationError::OutOfRange {
        field: "totalCents".to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

/// Gives back to the snapshot the stock held by a sale's current items.
///
/// Used before re-planning an updated sale so the new lines are checked
/// against the stock as it would be without the old ones.
pub fn restore_stock(
    catalog: &mut HashMap<String, Product>,
    items: &[SaleItem],
) -> CoreResult<()> {
    for item in items {
        if let Some(product) = catalog.get_mut(&item.product_id) {
            product.stock_quantity = product
                .stock_quantity
                .checked_add(item.quantity)
                .ok_or_else(|| ValidationError::OutOfRange {
                    field: "stockQuantity".to_string(),
                    min: 0,
                    max: i64::MAX,
                })?;
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
