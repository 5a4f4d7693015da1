//! Admin handlers
//!
//! Catalog and user provisioning, behind the admin token.

use axum::{extract::State, http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::app::CreateUser;
use crate::domain::entities::{NewProduct, Product, User};
use crate::error::AppError;
use crate::AppState;

/// Request to create a product
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    pub unit_price: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Request to create a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Response for user creation
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user: User,
    /// Shown once; only its hash is stored
    pub api_key: String,
}

/// POST /admin/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state
        .catalog_service
        .create_product(NewProduct {
            name: request.name,
            short_description: request.short_description,
            long_description: request.long_description,
            unit_price: request.unit_price,
            active: request.active,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// POST /admin/users
///
/// Provision a user and hand out their API key.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let (user, api_key) = state
        .user_service
        .create_user(CreateUser {
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CreateUserResponse { user, api_key })))
}
