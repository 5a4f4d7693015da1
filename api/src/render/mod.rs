//! Render module
//!
//! Plain-text views for clients that do not ask for JSON.

pub mod renderer;

pub use renderer::{render_cart, render_product, render_product_list};
