//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior. Clones share
//! the same storage.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Cart, CartId, CartItem, CartItemId, NewCart, NewProduct, NewUser, Product, ProductId, User,
    UserId, MAX_QUANTITY,
};
use crate::domain::ports::{CartRepository, ProductRepository, UserRepository};
use crate::error::DomainError;

// ============================================================================
// In-Memory Product Repository
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
    last_id: Arc<AtomicI64>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a product for testing
    pub fn with_product(self, product: Product) -> Self {
        self.last_id.fetch_max(product.id.0, Ordering::SeqCst);
        self.products.write().unwrap().insert(product.id, product);
        self
    }

    fn get(&self, id: &ProductId) -> Option<Product> {
        self.products.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.get(id))
    }

    async fn list_active(&self, limit: u64, offset: u64) -> Result<Vec<Product>, DomainError> {
        let products = self.products.read().unwrap();
        Ok(products
            .values()
            .filter(|p| p.active)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, new_product: &NewProduct) -> Result<Product, DomainError> {
        let product = Product {
            id: ProductId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1),
            name: new_product.name.clone(),
            short_description: new_product.short_description.clone(),
            long_description: new_product.long_description.clone(),
            unit_price: new_product.unit_price,
            active: new_product.active,
            created_at: Utc::now(),
        };

        self.products
            .write()
            .unwrap()
            .insert(product.id, product.clone());

        Ok(product)
    }
}

// ============================================================================
// In-Memory Cart Repository
// ============================================================================

#[derive(Clone)]
pub struct InMemoryCartRepository {
    products: InMemoryProductRepository,
    carts: Arc<RwLock<HashMap<CartId, Cart>>>,
    items: Arc<RwLock<BTreeMap<CartItemId, CartItem>>>,
    last_cart_id: Arc<AtomicI64>,
    last_item_id: Arc<AtomicI64>,
    competing_create: Arc<AtomicBool>,
}

impl InMemoryCartRepository {
    /// Cart lines are joined against the given product repository
    pub fn new(products: InMemoryProductRepository) -> Self {
        Self {
            products,
            carts: Arc::default(),
            items: Arc::default(),
            last_cart_id: Arc::default(),
            last_item_id: Arc::default(),
            competing_create: Arc::default(),
        }
    }

    /// Make the next `create` for a user lose a race: another cart for the
    /// same user is stored just before it.
    pub fn insert_competing_cart_on_next_create(&self) {
        self.competing_create.store(true, Ordering::SeqCst);
    }

    fn insert_cart(&self, user_id: Option<UserId>, session_key_hash: Option<String>) -> Cart {
        let now = Utc::now();
        let cart = Cart {
            id: CartId(self.last_cart_id.fetch_add(1, Ordering::SeqCst) + 1),
            user_id,
            session_key_hash,
            created_at: now,
            updated_at: now,
        };

        self.carts.write().unwrap().insert(cart.id, cart.clone());
        cart
    }

    /// Number of carts currently stored
    pub fn cart_count(&self) -> usize {
        self.carts.read().unwrap().len()
    }

    fn touch(&self, id: &CartId) {
        if let Some(cart) = self.carts.write().unwrap().get_mut(id) {
            cart.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, DomainError> {
        let carts = self.carts.read().unwrap();
        Ok(carts.values().find(|c| c.is_owned_by(user_id)).cloned())
    }

    async fn find_by_session(&self, session_key_hash: &str) -> Result<Option<Cart>, DomainError> {
        let carts = self.carts.read().unwrap();
        Ok(carts
            .values()
            .find(|c| c.session_key_hash.as_deref() == Some(session_key_hash))
            .cloned())
    }

    async fn create(&self, new_cart: &NewCart) -> Result<Cart, DomainError> {
        if let Some(user_id) = new_cart.user_id {
            if self.competing_create.swap(false, Ordering::SeqCst) {
                self.insert_cart(Some(user_id), None);
            }

            if self.carts.read().unwrap().values().any(|c| c.is_owned_by(&user_id)) {
                return Err(DomainError::AlreadyExists(format!(
                    "User {} already has a cart",
                    user_id
                )));
            }
        }

        Ok(self.insert_cart(new_cart.user_id, new_cart.session_key_hash.clone()))
    }

    async fn assign_user(&self, id: &CartId, user_id: &UserId) -> Result<Cart, DomainError> {
        let mut carts = self.carts.write().unwrap();
        let cart = carts
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Cart {} not found", id)))?;

        cart.user_id = Some(*user_id);
        cart.updated_at = Utc::now();
        Ok(cart.clone())
    }

    async fn attach_session(
        &self,
        id: &CartId,
        session_key_hash: &str,
    ) -> Result<Cart, DomainError> {
        let mut carts = self.carts.write().unwrap();
        if !carts.contains_key(id) {
            return Err(DomainError::NotFound(format!("Cart {} not found", id)));
        }

        for cart in carts.values_mut() {
            if cart.session_key_hash.as_deref() == Some(session_key_hash) {
                cart.session_key_hash = None;
            }
        }

        let cart = carts
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Cart {} not found", id)))?;
        cart.session_key_hash = Some(session_key_hash.to_string());
        cart.updated_at = Utc::now();
        Ok(cart.clone())
    }

    async fn delete(&self, id: &CartId) -> Result<(), DomainError> {
        self.carts.write().unwrap().remove(id);
        self.items
            .write()
            .unwrap()
            .retain(|_, item| item.cart_id != *id);
        Ok(())
    }

    async fn find_lines(
        &self,
        cart_id: &CartId,
    ) -> Result<Vec<(CartItem, Product)>, DomainError> {
        let items = self.items.read().unwrap();
        Ok(items
            .values()
            .filter(|item| item.cart_id == *cart_id)
            .filter_map(|item| {
                self.products
                    .get(&item.product_id)
                    .map(|product| (item.clone(), product))
            })
            .collect())
    }

    async fn find_item(
        &self,
        cart_id: &CartId,
        item_id: &CartItemId,
    ) -> Result<Option<CartItem>, DomainError> {
        let items = self.items.read().unwrap();
        Ok(items
            .get(item_id)
            .filter(|item| item.cart_id == *cart_id)
            .cloned())
    }

    async fn add_item(
        &self,
        cart_id: &CartId,
        product_id: &ProductId,
        quantity: i32,
    ) -> Result<CartItem, DomainError> {
        let item = {
            let mut items = self.items.write().unwrap();
            let existing = items
                .values_mut()
                .find(|item| item.cart_id == *cart_id && item.product_id == *product_id);

            match existing {
                Some(item) => {
                    let total = i64::from(item.quantity) + i64::from(quantity);
                    if total > i64::from(MAX_QUANTITY) {
                        return Err(DomainError::Validation(format!(
                            "Quantity can be at most {}",
                            MAX_QUANTITY
                        )));
                    }
                    item.quantity += quantity;
                    item.clone()
                }
                None => {
                    let item = CartItem {
                        id: CartItemId(self.last_item_id.fetch_add(1, Ordering::SeqCst) + 1),
                        cart_id: *cart_id,
                        product_id: *product_id,
                        quantity,
                        created_at: Utc::now(),
                    };
                    items.insert(item.id, item.clone());
                    item
                }
            }
        };

        self.touch(cart_id);
        Ok(item)
    }

    async fn set_item_quantity(
        &self,
        item_id: &CartItemId,
        quantity: i32,
    ) -> Result<CartItem, DomainError> {
        if quantity < 1 {
            return Err(DomainError::Validation(format!(
                "Quantity must be at least 1, got {}",
                quantity
            )));
        }

        let item = {
            let mut items = self.items.write().unwrap();
            let item = items
                .get_mut(item_id)
                .ok_or_else(|| DomainError::NotFound(format!("Cart item {} not found", item_id)))?;
            item.quantity = quantity;
            item.clone()
        };

        self.touch(&item.cart_id);
        Ok(item)
    }

    async fn remove_item(&self, item_id: &CartItemId) -> Result<(), DomainError> {
        self.items.write().unwrap().remove(item_id);
        Ok(())
    }
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    last_id: Arc<AtomicI64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.last_id.fetch_max(user.id.0, Ordering::SeqCst);
        self.users.write().unwrap().insert(user.id, user);
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.api_key_hash == hash).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.username == new_user.username) {
            return Err(DomainError::AlreadyExists(format!(
                "User with username '{}' already exists",
                new_user.username
            )));
        }

        let user = User {
            id: UserId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            api_key_hash: new_user.api_key_hash.clone(),
            created_at: Utc::now(),
        };

        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_product, test_user};

    #[tokio::test]
    async fn product_ids_continue_after_seeded_products() {
        let repo = InMemoryProductRepository::new().with_product(test_product());

        let created = repo
            .create(&crate::test_utils::test_new_product("next"))
            .await
            .unwrap();

        assert_eq!(created.id, ProductId(2));
    }

    #[tokio::test]
    async fn cart_lines_join_products() {
        let products = InMemoryProductRepository::new().with_product(test_product());
        let repo = InMemoryCartRepository::new(products);
        let cart = repo.create(&NewCart::default()).await.unwrap();

        repo.add_item(&cart.id, &ProductId(1), 2).await.unwrap();
        let lines = repo.find_lines(&cart.id).await.unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0.quantity, 2);
        assert_eq!(lines[0].1.name, "test");
    }

    #[tokio::test]
    async fn delete_cart_removes_items() {
        let products = InMemoryProductRepository::new().with_product(test_product());
        let repo = InMemoryCartRepository::new(products);
        let cart = repo.create(&NewCart::default()).await.unwrap();
        let item = repo.add_item(&cart.id, &ProductId(1), 1).await.unwrap();

        repo.delete(&cart.id).await.unwrap();

        assert_eq!(repo.cart_count(), 0);
        assert!(repo.find_item(&cart.id, &item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let repo = InMemoryUserRepository::new().with_user(test_user());
        let user = test_user();

        let result = repo
            .create(&NewUser {
                username: user.username,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                api_key_hash: "other".to_string(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::AlreadyExists(_))));
        assert!(repo.find_by_username("test").await.unwrap().is_some());
    }
}
