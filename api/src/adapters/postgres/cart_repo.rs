//! PostgreSQL adapter for CartRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::domain::entities::{
    Cart, CartId, CartItem, CartItemId, NewCart, Product, ProductId, UserId, MAX_QUANTITY,
};
use crate::domain::ports::CartRepository;
use crate::entity::{cart_items, carts, products};
use crate::error::DomainError;

/// PostgreSQL implementation of CartRepository
pub struct PostgresCartRepository {
    db: DatabaseConnection,
}

impl PostgresCartRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Bump a cart's `updated_at`
    async fn touch<C: ConnectionTrait>(conn: &C, id: i64) -> Result<(), DomainError> {
        carts::Entity::update_many()
            .col_expr(
                carts::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(carts::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

fn update_err(e: DbErr, what: String) -> DomainError {
    match e {
        DbErr::RecordNotUpdated => DomainError::NotFound(what),
        e => DomainError::Database(e.to_string()),
    }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, DomainError> {
        let result = carts::Entity::find()
            .filter(carts::Column::UserId.eq(user_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_session(&self, session_key_hash: &str) -> Result<Option<Cart>, DomainError> {
        let result = carts::Entity::find()
            .filter(carts::Column::SessionKeyHash.eq(session_key_hash))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, cart: &NewCart) -> Result<Cart, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = carts::ActiveModel {
            user_id: Set(cart.user_id.map(|u| u.0)),
            session_key_hash: Set(cart.session_key_hash.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // A user owns one cart at most (carts_user_id_key)
        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::AlreadyExists(format!(
                "User {} already has a cart",
                cart.user_id.map(|u| u.0).unwrap_or_default()
            )),
            _ => DomainError::Database(e.to_string()),
        })?;

        Ok(result.into())
    }

    async fn assign_user(&self, id: &CartId, user_id: &UserId) -> Result<Cart, DomainError> {
        let result = carts::ActiveModel {
            id: Set(id.0),
            user_id: Set(Some(user_id.0)),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| update_err(e, format!("Cart {} not found", id)))?;

        Ok(result.into())
    }

    async fn attach_session(
        &self,
        id: &CartId,
        session_key_hash: &str,
    ) -> Result<Cart, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        // A session points at one cart at most
        carts::Entity::update_many()
            .col_expr(
                carts::Column::SessionKeyHash,
                Expr::value(Option::<String>::None),
            )
            .filter(carts::Column::SessionKeyHash.eq(session_key_hash))
            .filter(carts::Column::Id.ne(id.0))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let result = carts::ActiveModel {
            id: Set(id.0),
            session_key_hash: Set(Some(session_key_hash.to_string())),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| update_err(e, format!("Cart {} not found", id)))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &CartId) -> Result<(), DomainError> {
        // Items go with the cart (ON DELETE CASCADE)
        carts::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_lines(
        &self,
        cart_id: &CartId,
    ) -> Result<Vec<(CartItem, Product)>, DomainError> {
        let rows = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart_id.0))
            .order_by_asc(cart_items::Column::Id)
            .find_also_related(products::Entity)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|(item, product)| match product {
                Some(product) => Some((item.into(), product.into())),
                None => {
                    tracing::warn!(
                        cart_id = %cart_id,
                        item_id = item.id,
                        "Cart item references a missing product"
                    );
                    None
                }
            })
            .collect())
    }

    async fn find_item(
        &self,
        cart_id: &CartId,
        item_id: &CartItemId,
    ) -> Result<Option<CartItem>, DomainError> {
        let result = cart_items::Entity::find()
            .filter(cart_items::Column::Id.eq(item_id.0))
            .filter(cart_items::Column::CartId.eq(cart_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn add_item(
        &self,
        cart_id: &CartId,
        product_id: &ProductId,
        quantity: i32,
    ) -> Result<CartItem, DomainError> {
        let model = cart_items::ActiveModel {
            cart_id: Set(cart_id.0),
            product_id: Set(product_id.0),
            quantity: Set(quantity),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let merged = Expr::col((cart_items::Entity, cart_items::Column::Quantity)).add(quantity);

        // INSERT ... ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = quantity + n
        //     WHERE quantity + n <= MAX_QUANTITY
        // A blocked update inserts nothing, which SeaORM reports as RecordNotInserted.
        cart_items::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([cart_items::Column::CartId, cart_items::Column::ProductId])
                    .value(cart_items::Column::Quantity, merged.clone())
                    .action_and_where(Expr::expr(merged).lte(MAX_QUANTITY))
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotInserted => DomainError::Validation(format!(
                    "Quantity can be at most {}",
                    MAX_QUANTITY
                )),
                e => DomainError::Database(e.to_string()),
            })?;

        Self::touch(&self.db, cart_id.0).await?;

        let result = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart_id.0))
            .filter(cart_items::Column::ProductId.eq(product_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| {
                DomainError::Internal(format!(
                    "Cart item for product {} vanished after upsert",
                    product_id
                ))
            })?;

        Ok(result.into())
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

        let result = cart_items::ActiveModel {
            id: Set(item_id.0),
            quantity: Set(quantity),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| update_err(e, format!("Cart item {} not found", item_id)))?;

        Self::touch(&self.db, result.cart_id).await?;

        Ok(result.into())
    }

    async fn remove_item(&self, item_id: &CartItemId) -> Result<(), DomainError> {
        cart_items::Entity::delete_by_id(item_id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<carts::Model> for Cart {
    fn from(model: carts::Model) -> Self {
        Cart {
            id: CartId(model.id),
            user_id: model.user_id.map(UserId),
            session_key_hash: model.session_key_hash,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Convert SeaORM model to domain entity
impl From<cart_items::Model> for CartItem {
    fn from(model: cart_items::Model) -> Self {
        CartItem {
            id: CartItemId(model.id),
            cart_id: CartId(model.cart_id),
            product_id: ProductId(model.product_id),
            quantity: model.quantity,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
