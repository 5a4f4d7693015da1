//! Cart domain entities
//!
//! A cart belongs to a session, a user, or both, and holds at most one item
//! per product. Item quantities stay within 1..=MAX_QUANTITY; an item whose
//! quantity drops to zero is deleted instead.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{Product, ProductId};
use super::user::UserId;

/// Largest quantity a cart item may hold
pub const MAX_QUANTITY: i32 = 9_999;

/// Unique identifier for a cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub i64);

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a cart item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(pub i64);

impl std::fmt::Display for CartItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted shopping cart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: Option<UserId>,
    /// SHA-256 of the session token bound to this cart
    #[serde(skip_serializing)]
    pub session_key_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Anonymous carts have not been claimed by a user yet
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id.as_ref() == Some(user_id)
    }
}

/// Data needed to create a new cart
#[derive(Debug, Clone, Default)]
pub struct NewCart {
    pub user_id: Option<UserId>,
    pub session_key_hash: Option<String>,
}

/// One line of a cart: a product and how many of it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// A cart item joined with its product, as shown to the shopper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub id: CartItemId,
    pub product: Product,
    pub quantity: i32,
    pub line_total: Decimal,
}

impl CartLine {
    pub fn new(item: CartItem, product: Product) -> Self {
        let line_total = product.price_for(item.quantity);
        Self {
            id: item.id,
            product,
            quantity: item.quantity,
            line_total,
        }
    }
}

/// Totals for a cart, persisted or not
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSummary {
    /// `None` until the cart is persisted
    pub id: Option<CartId>,
    pub user_id: Option<UserId>,
    pub total_quantity: i64,
    pub item_count: usize,
    pub subtotal: Decimal,
}

/// Everything the cart views render: the cart and its lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartContext {
    pub cart: CartSummary,
    pub cart_items: Vec<CartLine>,
}

impl CartContext {
    /// Context for a persisted cart. Lines are ordered by item id.
    pub fn new(cart: &Cart, mut lines: Vec<CartLine>) -> Self {
        lines.sort_by_key(|line| line.id);

        let total_quantity = lines.iter().map(|l| i64::from(l.quantity)).sum();
        let subtotal = lines.iter().map(|l| l.line_total).sum();

        Self {
            cart: CartSummary {
                id: Some(cart.id),
                user_id: cart.user_id,
                total_quantity,
                item_count: lines.len(),
                subtotal,
            },
            cart_items: lines,
        }
    }

    /// Context for a shopper that has no cart yet
    pub fn empty(user_id: Option<UserId>) -> Self {
        Self {
            cart: CartSummary {
                id: None,
                user_id,
                total_quantity: 0,
                item_count: 0,
                subtotal: Decimal::ZERO,
            },
            cart_items: Vec::new(),
        }
    }

    pub fn total_quantity(&self) -> i64 {
        self.cart.total_quantity
    }

    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }
}
