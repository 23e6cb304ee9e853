//! PostgreSQL persistence for the fulfillment aggregates.
//!
//! One repository per aggregate, each implementing the corresponding domain
//! trait over a shared [`sqlx::PgPool`]. Status columns are stored as text
//! and parsed back through the domain `FromStr` impls; item lists, contacts
//! and addresses are JSONB.

pub mod carts;
pub mod deliveries;
pub mod orders;

pub use carts::PostgresCartRepository;
pub use deliveries::PostgresDeliveryRepository;
pub use orders::PostgresOrderRepository;

use domain::DomainError;
use sqlx::PgPool;

/// Applies the schema migrations to the given pool.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

pub(crate) fn db_error(err: sqlx::Error) -> DomainError {
    DomainError::Storage(err.to_string())
}

pub(crate) fn corrupt(what: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Storage(format!("stored {what} is invalid: {err}"))
}

/// True when the database rejected an insert because the key already exists.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
