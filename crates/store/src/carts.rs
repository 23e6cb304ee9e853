//! Postgres cart repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::UserId;
use domain::{Cart, CartRepository, DomainError, LineItem};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

/// PostgreSQL-backed [`CartRepository`]. The primary key on `user_id` is
/// what enforces "at most one live cart per user".
#[derive(Clone)]
pub struct PostgresCartRepository {
    pool: PgPool,
}

impl PostgresCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_cart(row: PgRow) -> Result<Cart, DomainError> {
        let items_json: serde_json::Value = row.try_get("items").map_err(crate::db_error)?;
        let items: Vec<LineItem> =
            serde_json::from_value(items_json).map_err(|err| crate::corrupt("cart items", err))?;

        Ok(Cart::restore(
            UserId::from_uuid(row.try_get::<Uuid, _>("user_id").map_err(crate::db_error)?),
            items,
            row.try_get::<DateTime<Utc>, _>("created_at")
                .map_err(crate::db_error)?,
        ))
    }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Cart>, DomainError> {
        let row = sqlx::query("SELECT user_id, items, created_at FROM carts WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(crate::db_error)?;

        row.map(Self::row_to_cart).transpose()
    }

    async fn insert(&self, cart: &Cart) -> Result<(), DomainError> {
        let items =
            serde_json::to_value(cart.items()).map_err(|err| crate::corrupt("cart items", err))?;

        sqlx::query("INSERT INTO carts (user_id, items, created_at) VALUES ($1, $2, $3)")
            .bind(cart.user_id().as_uuid())
            .bind(items)
            .bind(cart.created_at())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if crate::is_unique_violation(&err) {
                    DomainError::Conflict {
                        entity: "cart",
                        id: cart.user_id().to_string(),
                    }
                } else {
                    crate::db_error(err)
                }
            })?;

        Ok(())
    }

    async fn update(&self, cart: &Cart) -> Result<(), DomainError> {
        let items =
            serde_json::to_value(cart.items()).map_err(|err| crate::corrupt("cart items", err))?;

        let result = sqlx::query("UPDATE carts SET items = $2 WHERE user_id = $1")
            .bind(cart.user_id().as_uuid())
            .bind(items)
            .execute(&self.pool)
            .await
            .map_err(crate::db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("cart", cart.user_id()));
        }
        Ok(())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(crate::db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("cart", user_id));
        }
        Ok(())
    }
}
