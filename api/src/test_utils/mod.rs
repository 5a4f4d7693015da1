//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The in-memory repositories implement the same ports as the PostgreSQL
//! adapters, so they back both the service unit tests and the HTTP tests in
//! `integration_tests`, which drive the real router through `AppState`.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
