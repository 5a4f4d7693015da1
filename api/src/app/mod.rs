//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and repository ports.

pub mod cart_service;
pub mod catalog_service;
pub mod form_parser;
pub mod user_service;

pub use cart_service::{CartService, Shopper};
pub use catalog_service::CatalogService;
pub use form_parser::{parse_bulk_update, parse_quantity};
pub use user_service::{hash_token, CreateUser, UserService};
