//! Request identity
//!
//! - `api_key`: optional user authentication and the admin guard
//! - `session`: the session cookie that anonymous carts hang off

pub mod api_key;
pub mod session;

pub use api_key::{admin_middleware, optional_auth_middleware};
pub use session::session_middleware;
