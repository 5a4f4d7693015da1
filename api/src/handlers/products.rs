//! Product handlers
//!
//! Public catalog endpoints.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;

use super::respond::negotiate;
use crate::domain::entities::ProductId;
use crate::error::AppError;
use crate::render::{render_product, render_product_list};
use crate::AppState;

/// Query parameters for listing products
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

/// GET /products
///
/// List active products.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let products = state
        .catalog_service
        .list_products(query.limit, query.offset)
        .await?;

    Ok(negotiate(&headers, &products, |p| render_product_list(p)))
}

/// GET /products/:id
///
/// Product details; 404 for missing or inactive products.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let product = state.catalog_service.get_product(&ProductId(id)).await?;

    Ok(negotiate(&headers, &product, render_product))
}
