//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::app::hash_token;
use crate::domain::entities::{NewProduct, Product, ProductId, User, UserId};

/// API key of the user returned by `test_user`
pub const TEST_API_KEY: &str = "sk-test-api-key";

/// Create a test product with default values
pub fn test_product() -> Product {
    Product {
        id: ProductId(1),
        name: "test".to_string(),
        short_description: "test".to_string(),
        long_description: "test".to_string(),
        unit_price: Decimal::new(10, 1),
        active: true,
        created_at: Utc::now(),
    }
}

/// Create a test product with a specific id and price in cents
pub fn test_product_with_price(id: i64, cents: i64) -> Product {
    Product {
        id: ProductId(id),
        name: format!("product-{}", id),
        short_description: format!("Product {}", id),
        long_description: format!("The long description of product {}", id),
        unit_price: Decimal::new(cents, 2),
        active: true,
        created_at: Utc::now(),
    }
}

/// Data for creating a product through a repository or service
pub fn test_new_product(name: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        short_description: "test".to_string(),
        long_description: "test".to_string(),
        unit_price: Decimal::new(10, 1),
        active: true,
    }
}

/// Create a test user whose API key is `TEST_API_KEY`
pub fn test_user() -> User {
    User {
        id: UserId(1),
        username: "test".to_string(),
        email: "test@example.com".to_string(),
        first_name: "Test".to_string(),
        last_name: "Tester".to_string(),
        api_key_hash: hash_token(TEST_API_KEY),
        created_at: Utc::now(),
    }
}

/// Create a test user with a specific name; the API key is `sk-<name>`
pub fn test_user_named(name: &str) -> User {
    User {
        id: UserId(name.bytes().map(i64::from).sum()),
        username: name.to_string(),
        email: format!("{}@example.com", name),
        first_name: name.to_string(),
        last_name: String::new(),
        api_key_hash: hash_token(&format!("sk-{}", name)),
        created_at: Utc::now(),
    }
}
