//! Catalog service
//!
//! Read access to products for shoppers, and product creation for the admin.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::entities::{NewProduct, Product, ProductId};
use crate::domain::ports::ProductRepository;
use crate::error::{AppError, DomainError};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Service for browsing and managing products
pub struct CatalogService<PR>
where
    PR: ProductRepository + ?Sized,
{
    products: Arc<PR>,
}

impl<PR> CatalogService<PR>
where
    PR: ProductRepository + ?Sized,
{
    pub fn new(products: Arc<PR>) -> Self {
        Self { products }
    }

    /// List active products. `limit` is clamped to 1..=100.
    pub async fn list_products(
        &self,
        limit: Option<u64>,
        offset: u64,
    ) -> Result<Vec<Product>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        Ok(self.products.list_active(limit, offset).await?)
    }

    /// Get an active product, 404 otherwise
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, AppError> {
        self.products
            .find_by_id(id)
            .await?
            .filter(|p| p.active)
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    /// Create a product
    pub async fn create_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let name = product.name.trim();
        if name.is_empty() || name.chars().count() > 255 {
            return Err(AppError::BadRequest(
                "Name must be between 1 and 255 characters".to_string(),
            ));
        }

        if product.unit_price < Decimal::ZERO {
            return Err(DomainError::Validation("Unit price cannot be negative".to_string()).into());
        }

        let product = NewProduct {
            name: name.to_string(),
            unit_price: product.unit_price.round_dp(2),
            ..product
        };

        let created = self.products.create(&product).await?;
        tracing::info!(product_id = %created.id, name = %created.name, "Created product");

        Ok(created)
    }
}
