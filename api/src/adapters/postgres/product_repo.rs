//! PostgreSQL adapter for ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::entities::{NewProduct, Product, ProductId};
use crate::domain::ports::ProductRepository;
use crate::entity::products;
use crate::error::DomainError;

/// PostgreSQL implementation of ProductRepository
pub struct PostgresProductRepository {
    db: DatabaseConnection,
}

impl PostgresProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let result = products::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_active(&self, limit: u64, offset: u64) -> Result<Vec<Product>, DomainError> {
        let results = products::Entity::find()
            .filter(products::Column::Active.eq(true))
            .order_by_asc(products::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, DomainError> {
        let model = products::ActiveModel {
            name: Set(product.name.clone()),
            short_description: Set(product.short_description.clone()),
            long_description: Set(product.long_description.clone()),
            unit_price: Set(product.unit_price),
            active: Set(product.active),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }
}

/// Convert SeaORM model to domain entity
impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Product {
            id: ProductId(model.id),
            name: model.name,
            short_description: model.short_description,
            long_description: model.long_description,
            unit_price: model.unit_price,
            active: model.active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
