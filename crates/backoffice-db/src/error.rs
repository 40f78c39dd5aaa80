//! # Database Errors
//!
//! ```text
//! sqlx::Error ──┬── RowNotFound ─────────────► NotFound
//!               ├── Database(kind) ──┬─ unique ► UniqueViolation
//!               │                    ├─ fk ────► ForeignKeyViolation
//!               │                    ├─ check ─► CheckViolation
//!               │                    └─ other ─► QueryFailed
//!               ├── PoolTimedOut ────────────► PoolExhausted
//!               ├── PoolClosed ──────────────► ConnectionFailed
//!               └── anything else ───────────► QueryFailed
//! ```
//!
//! The HTTP layer turns NotFound into 404, constraint violations into 400,
//! and hides everything else behind a 500.

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row matched the id (`UPDATE`/`DELETE` affected nothing, or a lookup came back empty).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate value: {message}")]
    UniqueViolation { message: String },

    /// A sale item pointing at a product that does not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Negative stock or price, or a zero quantity, reached the table.
    #[error("Constraint violation: {message}")]
    CheckViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation { message },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation => DbError::CheckViolation { message },
                    _ => DbError::QueryFailed(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[test]
    fn test_pool_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::NotFound { .. }
        ));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            DbError::not_found("Sale", "abc").to_string(),
            "Sale not found: abc"
        );
    }

    #[tokio::test]
    async fn test_negative_stock_is_a_check_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err: DbError = sqlx::query(
            "INSERT INTO products (id, name, description, price_cents, stock_quantity, \
             is_active, created_at, updated_at) \
             VALUES ('p', 'n', 'd', 100, -1, 1, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();

        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_unknown_product_on_item_is_a_foreign_key_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query(
            "INSERT INTO sales (id, total_cents, sold_at, updated_at) \
             VALUES ('s', 0, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err: DbError = sqlx::query(
            "INSERT INTO sale_items (id, sale_id, product_id, line_no, name_snapshot, \
             unit_price_cents, quantity, line_total_cents) \
             VALUES ('i', 's', 'missing', 0, 'n', 100, 1, 100)",
        )
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
