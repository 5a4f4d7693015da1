//! Bundled database schema

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::error::DomainError;

const INIT_SQL: &str = include_str!("../../../migrations/0001_init.sql");

/// Create the shop tables if they do not exist yet
pub async fn apply_schema(db: &DatabaseConnection) -> Result<(), DomainError> {
    db.execute_unprepared(INIT_SQL)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    tracing::info!("Database schema is up to date");
    Ok(())
}
