//! SeaORM entities
//!
//! Table mappings used by the PostgreSQL adapters. Schema lives in
//! `migrations/0001_init.sql`.

pub mod cart_items;
pub mod carts;
pub mod products;
pub mod users;
