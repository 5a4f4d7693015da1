//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! The traits are object safe so the HTTP state can hold `Arc<dyn ...>` and
//! tests can swap in the in-memory implementations.

use async_trait::async_trait;

use crate::domain::entities::{
    Cart, CartId, CartItem, CartItemId, NewCart, NewProduct, NewUser, Product, ProductId, User,
    UserId,
};
use crate::error::DomainError;

/// Repository for Product entities
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find a product by ID (active or not)
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError>;

    /// List active products ordered by ID
    async fn list_active(&self, limit: u64, offset: u64) -> Result<Vec<Product>, DomainError>;

    /// Create a new product
    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError>;
}

/// Repository for Cart and CartItem entities
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Find the cart owned by a user
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, DomainError>;

    /// Find the cart bound to a session key hash
    async fn find_by_session(&self, session_key_hash: &str) -> Result<Option<Cart>, DomainError>;

    /// Create a new cart
    async fn create(&self, cart: &NewCart) -> Result<Cart, DomainError>;

    /// Give an anonymous cart to a user
    async fn assign_user(&self, id: &CartId, user_id: &UserId) -> Result<Cart, DomainError>;

    /// Bind a session to a cart, unbinding it from any other cart
    async fn attach_session(
        &self,
        id: &CartId,
        session_key_hash: &str,
    ) -> Result<Cart, DomainError>;

    /// Delete a cart and all of its items
    async fn delete(&self, id: &CartId) -> Result<(), DomainError>;

    // Items

    /// All items of a cart joined with their products
    async fn find_lines(&self, cart_id: &CartId)
        -> Result<Vec<(CartItem, Product)>, DomainError>;

    /// Find an item, but only if it belongs to the given cart
    async fn find_item(
        &self,
        cart_id: &CartId,
        item_id: &CartItemId,
    ) -> Result<Option<CartItem>, DomainError>;

    /// Add `quantity` units of a product: increments the existing item for
    /// the product or creates a new one. Fails with `Validation` when the
    /// item would exceed `MAX_QUANTITY`.
    async fn add_item(
        &self,
        cart_id: &CartId,
        product_id: &ProductId,
        quantity: i32,
    ) -> Result<CartItem, DomainError>;

    /// Set an item's quantity (must be at least 1)
    async fn set_item_quantity(
        &self,
        item_id: &CartItemId,
        quantity: i32,
    ) -> Result<CartItem, DomainError>;

    /// Remove an item
    async fn remove_item(&self, item_id: &CartItemId) -> Result<(), DomainError>;
}

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by API key hash
    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
}
