//! Product domain entity
//!
//! A catalog entry that can be put in a cart. Products are created by the
//! catalog admin and are read-only from the cart's point of view.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unique identifier for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    pub unit_price: Decimal,
    /// Inactive products are hidden from shoppers
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Price of `quantity` units of this product
    pub fn price_for(&self, quantity: i32) -> Decimal {
        self.unit_price * Decimal::from(quantity)
    }
}

/// Data needed to create a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    pub unit_price: Decimal,
    pub active: bool,
}
