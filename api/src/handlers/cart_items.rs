//! Cart item handlers
//!
//! Endpoints acting on a single item of the current cart.

use axum::{
    extract::{Form, Path, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;

use super::respond::mutation_response;
use crate::app::{parse_quantity, Shopper};
use crate::domain::entities::CartItemId;
use crate::error::AppError;
use crate::AppState;

/// Form for setting one item's quantity
#[derive(Debug, Deserialize)]
pub struct ItemQuantityForm {
    pub item_quantity: String,
}

/// PUT /cart/item/:id
///
/// Set the quantity of an item; 0 removes it.
pub async fn update_item(
    State(state): State<AppState>,
    shopper: Shopper,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<ItemQuantityForm>,
) -> Result<Response, AppError> {
    let quantity = parse_quantity("item_quantity", &form.item_quantity)?;
    let context = state
        .cart_service
        .update_item(&shopper, &CartItemId(id), quantity)
        .await?;

    Ok(mutation_response(&headers, &context))
}

/// DELETE /cart/item/:id
pub async fn delete_item(
    State(state): State<AppState>,
    shopper: Shopper,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let context = state
        .cart_service
        .delete_item(&shopper, &CartItemId(id))
        .await?;

    Ok(mutation_response(&headers, &context))
}
