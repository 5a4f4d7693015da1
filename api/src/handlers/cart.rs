//! Cart handlers
//!
//! The cart page and the whole-cart mutations. Every mutation answers with
//! `respond::mutation_response`.

use std::collections::HashMap;

use axum::{
    extract::{Form, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;

use super::respond::{mutation_response, negotiate};
use crate::app::{parse_bulk_update, Shopper};
use crate::domain::entities::ProductId;
use crate::error::AppError;
use crate::render::render_cart;
use crate::AppState;

/// Form for adding a product to the cart
#[derive(Debug, Deserialize)]
pub struct AddItemForm {
    pub add_item_id: i64,
    #[serde(default = "default_quantity")]
    pub add_item_quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// GET /cart
///
/// Show the current cart. Never creates one.
pub async fn get_cart(
    State(state): State<AppState>,
    shopper: Shopper,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let context = state.cart_service.cart_context(&shopper).await?;

    Ok(negotiate(&headers, &context, render_cart))
}

/// POST /cart, POST /cart/item
///
/// Add a product, creating the cart if needed.
pub async fn add_item(
    State(state): State<AppState>,
    shopper: Shopper,
    headers: HeaderMap,
    Form(form): Form<AddItemForm>,
) -> Result<Response, AppError> {
    let context = state
        .cart_service
        .add_item(&shopper, &ProductId(form.add_item_id), form.add_item_quantity)
        .await?;

    Ok(mutation_response(&headers, &context))
}

/// DELETE /cart, POST /cart/delete
///
/// Delete the cart and all its items.
pub async fn empty_cart(
    State(state): State<AppState>,
    shopper: Shopper,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let context = state.cart_service.empty_cart(&shopper).await?;

    Ok(mutation_response(&headers, &context))
}

/// PUT /cart, POST /cart/update
///
/// Set quantities from `update_item-<id>=<quantity>` fields.
pub async fn update_cart(
    State(state): State<AppState>,
    shopper: Shopper,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let updates = parse_bulk_update(&fields)?;
    let context = state
        .cart_service
        .update_quantities(&shopper, &updates)
        .await?;

    Ok(mutation_response(&headers, &context))
}
