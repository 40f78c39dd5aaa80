//! # Domain Types
//!
//! Core domain types used throughout the back office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  product_id     │       │
//! │  │  name           │   │  sold_at        │◄──│  name snapshot  │       │
//! │  │  price_cents    │   │  items          │   │  unit price     │       │
//! │  │  stock_quantity │   │  total (derived)│   │  quantity       │       │
//! │  │  is_active      │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Requests: ProductInput (create/update body), SaleLineRequest          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A sellable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free text, at most 255 characters.
    pub description: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock_quantity: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a new product from a create request.
    pub fn from_input(id: String, input: ProductInput, now: DateTime<Utc>) -> Self {
        Product {
            id,
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            price_cents: input.price_cents,
            stock_quantity: input.stock_quantity,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every mutable field with the request's values.
    pub fn apply(&mut self, input: ProductInput, now: DateTime<Utc>) {
        self.name = input.name.trim().to_string();
        self.description = input.description.trim().to_string();
        self.price_cents = input.price_cents;
        self.stock_quantity = input.stock_quantity;
        self.is_active = input.is_active;
        self.updated_at = now;
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks if `quantity` units can be sold right now.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.is_active && self.stock_quantity >= quantity
    }
}

fn default_active() -> bool {
    true
}

/// Body of `POST /produtos` and `PUT /produtos/{id}`.
///
/// Update is a full overwrite, so both operations share one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub stock_quantity: i64,
    /// Missing means active, as for a freshly created product.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

// =============================================================================
// Sale Request
// =============================================================================

/// One requested line of a sale: which product and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    pub product_id: String,
    pub quantity: i64,
}

impl SaleLineRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        SaleLineRequest {
            product_id: product_id.into(),
            quantity,
        }
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold.
    pub quantity: i64,
    /// unit_price × quantity.
    pub line_total_cents: i64,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total recomputed from the frozen price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale transaction.
///
/// ## Invariant
/// `total` always equals the sum of `unit_price × quantity` over `items`.
/// There is no setter for the total: it is recomputed every time the item
/// list is replaced, and an empty sale totals zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// When the sale happened. Reports filter on this; updates refresh it.
    pub sold_at: DateTime<Utc>,
    items: Vec<SaleItem>,
    total_cents: i64,
}

impl Sale {
    pub fn new(id: String, sold_at: DateTime<Utc>, items: Vec<SaleItem>) -> Self {
        let total_cents = total_of(&items).cents();
        Sale {
            id,
            sold_at,
            items,
            total_cents,
        }
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    pub fn total_cents(&self) -> i64 {
        self.total_cents
    }

    /// Replaces the item list, refreshes the timestamp and recomputes the total.
    ///
    /// Returns the items that were replaced.
    pub fn replace_items(&mut self, items: Vec<SaleItem>, sold_at: DateTime<Utc>) -> Vec<SaleItem> {
        self.total_cents = total_of(&items).cents();
        self.sold_at = sold_at;
        std::mem::replace(&mut self.items, items)
    }
}

fn total_of(items: &[SaleItem]) -> Money {
    items.iter().map(SaleItem::line_total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64, qty: i64) -> SaleItem {
        SaleItem {
            id: id.to_string(),
            product_id: format!("p-{id}"),
            product_name: "Widget".to_string(),
            unit_price_cents: price,
            quantity: qty,
            line_total_cents: price * qty,
        }
    }

    #[test]
    fn test_sale_total_is_sum_of_lines() {
        let sale = Sale::new(
            "s-1".to_string(),
            Utc::now(),
            vec![item("a", 500, 3), item("b", 250, 2)],
        );
        assert_eq!(sale.total_cents(), 2000);
        assert_eq!(sale.items().len(), 2);
    }

    #[test]
    fn test_empty_sale_totals_zero() {
        let sale = Sale::new("s-1".to_string(), Utc::now(), vec![]);
        assert!(sale.total().is_zero());
    }

    #[test]
    fn test_replace_items_recomputes_total() {
        let first = Utc::now();
        let mut sale = Sale::new("s-1".to_string(), first, vec![item("a", 500, 3)]);
        let later = first + chrono::Duration::minutes(5);

        let old = sale.replace_items(vec![item("b", 100, 1)], later);

        assert_eq!(old.len(), 1);
        assert_eq!(sale.total_cents(), 100);
        assert_eq!(sale.sold_at, later);
    }

    #[test]
    fn test_product_input_defaults_to_active() {
        let input: ProductInput = serde_json::from_str(
            r#"{"name":"Pen","description":"Blue pen","priceCents":150,"stockQuantity":4}"#,
        )
        .unwrap();
        assert!(input.is_active);
    }

    #[test]
    fn test_product_apply_overwrites_fields() {
        let now = Utc::now();
        let input = ProductInput {
            name: " Pen ".to_string(),
            description: "Blue".to_string(),
            price_cents: 150,
            stock_quantity: 4,
            is_active: true,
        };
        let mut product = Product::from_input("p-1".to_string(), input, now);
        assert_eq!(product.name, "Pen");

        product.apply(
            ProductInput {
                name: "Pencil".to_string(),
                description: "HB".to_string(),
                price_cents: 90,
                stock_quantity: 0,
                is_active: false,
            },
            now,
        );
        assert_eq!(product.name, "Pencil");
        assert_eq!(product.price_cents, 90);
        assert!(!product.is_active);
        assert!(!product.can_sell(1));
    }

    #[test]
    fn test_sale_serializes_camel_case() {
        let sale = Sale::new("s-1".to_string(), Utc::now(), vec![item("a", 500, 3)]);
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["totalCents"], 1500);
        assert_eq!(json["items"][0]["unitPriceCents"], 500);
        assert!(json.get("soldAt").is_some());
    }
}
