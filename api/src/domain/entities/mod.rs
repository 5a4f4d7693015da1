//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::{
    Cart, CartContext, CartId, CartItem, CartItemId, CartLine, NewCart, MAX_QUANTITY,
};
pub use product::{NewProduct, Product, ProductId};
pub use user::{NewUser, User, UserId};
