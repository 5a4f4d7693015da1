//! HTTP handlers
//!
//! Axum request handlers for the shop endpoints.

pub mod admin;
pub mod cart;
pub mod cart_items;
pub mod products;
pub mod respond;

pub use admin::{create_product, create_user};
pub use cart::{add_item, empty_cart, get_cart, update_cart};
pub use cart_items::{delete_item, update_item};
pub use products::{get_product, list_products};
