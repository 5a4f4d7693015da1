//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod cart_repo;
pub mod product_repo;
pub mod schema;
pub mod user_repo;


pub use cart_repo::PostgresCartRepository;
pub use product_repo::PostgresProductRepository;
pub use schema::apply_schema;
pub use user_repo::PostgresUserRepository;
