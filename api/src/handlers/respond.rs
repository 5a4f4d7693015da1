//! Response helpers shared by the shop handlers
//!
//! GET views negotiate JSON vs plain text; mutations redirect to the cart
//! unless the request came from in-page script.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::entities::CartContext;

/// Where non-AJAX mutations send the browser
pub const CART_LOCATION: &str = "/cart";

/// Check if the client wants JSON response
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

/// Check if the request was sent by in-page script
pub fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("X-Requested-With")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false)
}

/// Either JSON or the plain-text rendering of the same view
pub fn negotiate<T: Serialize>(
    headers: &HeaderMap,
    data: &T,
    render: impl FnOnce(&T) -> String,
) -> Response {
    if wants_json(headers) {
        Json(data).into_response()
    } else {
        (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            render(data),
        )
            .into_response()
    }
}

/// JSON body answered to AJAX mutations
#[derive(Debug, Serialize)]
pub struct CartUpdateResponse {
    pub success: bool,
    pub total_quantity: i64,
    pub item_count: usize,
}

impl From<&CartContext> for CartUpdateResponse {
    fn from(context: &CartContext) -> Self {
        Self {
            success: true,
            total_quantity: context.total_quantity(),
            item_count: context.cart.item_count,
        }
    }
}

/// Response to a successful cart mutation
///
/// `302 Found` to the cart page, or `200` with the new totals for AJAX.
pub fn mutation_response(headers: &HeaderMap, context: &CartContext) -> Response {
    if is_ajax(headers) {
        Json(CartUpdateResponse::from(context)).into_response()
    } else {
        (StatusCode::FOUND, [(header::LOCATION, CART_LOCATION)]).into_response()
    }
}
