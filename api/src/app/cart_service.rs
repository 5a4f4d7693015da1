//! Cart service
//!
//! Finds the shopper's cart (by user or by session), creates it on the first
//! mutation, and applies item operations. Every operation returns the
//! resulting cart context so AJAX callers get the new totals back.

use std::sync::Arc;

use crate::domain::entities::{
    Cart, CartContext, CartItemId, CartLine, NewCart, ProductId, User, UserId, MAX_QUANTITY,
};
use crate::domain::ports::{CartRepository, ProductRepository};
use crate::error::{AppError, DomainError};

/// Who is shopping: the session, plus the user when authenticated
#[derive(Debug, Clone)]
pub struct Shopper {
    pub user: Option<User>,
    pub session_key_hash: String,
}

impl Shopper {
    pub fn anonymous(session_key_hash: impl Into<String>) -> Self {
        Self {
            user: None,
            session_key_hash: session_key_hash.into(),
        }
    }

    pub fn authenticated(user: User, session_key_hash: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            session_key_hash: session_key_hash.into(),
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }
}

/// Service for cart retrieval and item operations
pub struct CartService<CR, PR>
where
    CR: CartRepository + ?Sized,
    PR: ProductRepository + ?Sized,
{
    carts: Arc<CR>,
    products: Arc<PR>,
}

impl<CR, PR> CartService<CR, PR>
where
    CR: CartRepository + ?Sized,
    PR: ProductRepository + ?Sized,
{
    pub fn new(carts: Arc<CR>, products: Arc<PR>) -> Self {
        Self { carts, products }
    }

    /// Find the shopper's cart without creating one
    ///
    /// A logged-in user adopts a non-empty anonymous session cart, replacing
    /// any cart they owned before. An empty anonymous session cart is dropped
    /// in favour of the user's own cart, or adopted when the user has none.
    /// Otherwise the user's own cart is used and bound to the current
    /// session. Anonymous shoppers only ever see anonymous carts.
    pub async fn current_cart(&self, shopper: &Shopper) -> Result<Option<Cart>, AppError> {
        let session_cart = self
            .carts
            .find_by_session(&shopper.session_key_hash)
            .await?;

        let Some(user) = &shopper.user else {
            return Ok(session_cart.filter(|cart| cart.is_anonymous()));
        };

        if let Some(cart) = session_cart {
            if cart.is_owned_by(&user.id) {
                return Ok(Some(cart));
            }

            if cart.is_anonymous() {
                return self.claim_session_cart(shopper, user, cart).await.map(Some);
            }
        }

        match self.carts.find_by_user(&user.id).await? {
            Some(cart) => Ok(Some(self.bind_session(shopper, cart).await?)),
            None => Ok(None),
        }
    }

    /// Find the shopper's cart, creating it if there is none
    pub async fn get_or_create_cart(&self, shopper: &Shopper) -> Result<Cart, AppError> {
        if let Some(cart) = self.current_cart(shopper).await? {
            return Ok(cart);
        }

        let created = self
            .carts
            .create(&NewCart {
                user_id: shopper.user_id(),
                session_key_hash: None,
            })
            .await;

        let cart = match created {
            Ok(cart) => cart,
            // A concurrent request created the user's cart first
            Err(DomainError::AlreadyExists(reason)) => {
                tracing::debug!(
                    user_id = ?shopper.user_id(),
                    %reason,
                    "Cart created concurrently"
                );
                return self.current_cart(shopper).await?.ok_or_else(|| {
                    AppError::Internal("Cart missing after concurrent create".to_string())
                });
            }
            Err(e) => return Err(e.into()),
        };

        // The session may still point at a cart we refused to show (owned by
        // another user), so bind it through attach_session which unbinds it.
        let cart = self
            .carts
            .attach_session(&cart.id, &shopper.session_key_hash)
            .await?;

        tracing::info!(
            cart_id = %cart.id,
            user_id = ?shopper.user_id(),
            "Created cart"
        );

        Ok(cart)
    }

    /// Context for the cart views; never creates a cart
    pub async fn cart_context(&self, shopper: &Shopper) -> Result<CartContext, AppError> {
        match self.current_cart(shopper).await? {
            Some(cart) => self.context_for(&cart).await,
            None => Ok(CartContext::empty(shopper.user_id())),
        }
    }

    /// Add `quantity` units of a product, merging with an existing item
    pub async fn add_item(
        &self,
        shopper: &Shopper,
        product_id: &ProductId,
        quantity: i32,
    ) -> Result<CartContext, AppError> {
        validate_quantity(quantity, 1)?;

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .filter(|p| p.active)
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))?;

        let cart = self.get_or_create_cart(shopper).await?;
        let item = self.carts.add_item(&cart.id, &product.id, quantity).await?;

        tracing::info!(
            cart_id = %cart.id,
            item_id = %item.id,
            product_id = %product.id,
            quantity = item.quantity,
            "Added product to cart"
        );

        self.context_for(&cart).await
    }

    /// Set quantities of several items at once; 0 removes the item
    ///
    /// All updates are checked before anything is written.
    pub async fn update_quantities(
        &self,
        shopper: &Shopper,
        updates: &[(CartItemId, i32)],
    ) -> Result<CartContext, AppError> {
        if updates.is_empty() {
            return self.cart_context(shopper).await;
        }

        let cart = self.require_cart(shopper).await?;

        for (item_id, quantity) in updates {
            validate_quantity(*quantity, 0)?;
            if self.carts.find_item(&cart.id, item_id).await?.is_none() {
                return Err(AppError::NotFound(format!(
                    "Cart item {} not found",
                    item_id
                )));
            }
        }

        for (item_id, quantity) in updates {
            self.apply_quantity(item_id, *quantity).await?;
        }

        tracing::info!(cart_id = %cart.id, count = updates.len(), "Updated cart quantities");

        self.context_for(&cart).await
    }

    /// Set the quantity of a single item; 0 removes it
    pub async fn update_item(
        &self,
        shopper: &Shopper,
        item_id: &CartItemId,
        quantity: i32,
    ) -> Result<CartContext, AppError> {
        self.update_quantities(shopper, &[(*item_id, quantity)])
            .await
    }

    /// Remove a single item
    pub async fn delete_item(
        &self,
        shopper: &Shopper,
        item_id: &CartItemId,
    ) -> Result<CartContext, AppError> {
        let cart = self.require_cart(shopper).await?;

        self.carts
            .find_item(&cart.id, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cart item {} not found", item_id)))?;

        self.carts.remove_item(item_id).await?;
        tracing::info!(cart_id = %cart.id, item_id = %item_id, "Removed cart item");

        self.context_for(&cart).await
    }

    /// Delete the shopper's cart and everything in it
    pub async fn empty_cart(&self, shopper: &Shopper) -> Result<CartContext, AppError> {
        if let Some(cart) = self.current_cart(shopper).await? {
            self.carts.delete(&cart.id).await?;
            tracing::info!(cart_id = %cart.id, "Deleted cart");
        }

        Ok(CartContext::empty(shopper.user_id()))
    }

    /// Resolve an anonymous session cart for a user who just logged in
    async fn claim_session_cart(
        &self,
        shopper: &Shopper,
        user: &User,
        cart: Cart,
    ) -> Result<Cart, AppError> {
        let is_empty = self.carts.find_lines(&cart.id).await?.is_empty();

        match self.carts.find_by_user(&user.id).await? {
            Some(owned) if is_empty => {
                self.carts.delete(&cart.id).await?;
                tracing::debug!(
                    cart_id = %cart.id,
                    user_id = %user.id,
                    "Dropped empty session cart in favour of user cart"
                );
                return self.bind_session(shopper, owned).await;
            }
            Some(previous) => {
                self.carts.delete(&previous.id).await?;
                tracing::debug!(
                    cart_id = %previous.id,
                    user_id = %user.id,
                    "Dropped previous user cart in favour of session cart"
                );
            }
            None => {}
        }

        let adopted = self.carts.assign_user(&cart.id, &user.id).await?;
        tracing::info!(cart_id = %adopted.id, user_id = %user.id, "User adopted session cart");
        Ok(adopted)
    }

    async fn bind_session(&self, shopper: &Shopper, cart: Cart) -> Result<Cart, AppError> {
        if cart.session_key_hash.as_deref() == Some(shopper.session_key_hash.as_str()) {
            return Ok(cart);
        }

        Ok(self
            .carts
            .attach_session(&cart.id, &shopper.session_key_hash)
            .await?)
    }

    async fn require_cart(&self, shopper: &Shopper) -> Result<Cart, AppError> {
        self.current_cart(shopper)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))
    }

    async fn apply_quantity(&self, item_id: &CartItemId, quantity: i32) -> Result<(), AppError> {
        if quantity == 0 {
            self.carts.remove_item(item_id).await?;
        } else {
            self.carts.set_item_quantity(item_id, quantity).await?;
        }
        Ok(())
    }

    async fn context_for(&self, cart: &Cart) -> Result<CartContext, AppError> {
        let lines = self
            .carts
            .find_lines(&cart.id)
            .await?
            .into_iter()
            .map(|(item, product)| CartLine::new(item, product))
            .collect();

        Ok(CartContext::new(cart, lines))
    }
}

fn validate_quantity(quantity: i32, min: i32) -> Result<(), DomainError> {
    if quantity < min || quantity > MAX_QUANTITY {
        return Err(DomainError::Validation(format!(
            "Quantity must be between {} and {}, got {}",
            min, MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}
