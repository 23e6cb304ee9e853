//! Postgres order repository.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{DeliveryId, Money, OrderId, UserId};
use domain::{DomainError, InternalStatus, LineItem, Order, OrderRepository, OrderStatus};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

const SELECT_ORDER: &str = "SELECT id, user_id, total_price_cents, status, internal_status, \
     delivery_id, note, items, created_at, updated_at FROM orders";

/// PostgreSQL-backed [`OrderRepository`].
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_order(row: PgRow) -> Result<Order, DomainError> {
        let status_text: String = row.try_get("status").map_err(crate::db_error)?;
        let status = OrderStatus::from_str(&status_text)
            .map_err(|err| crate::corrupt("order status", err))?;
        let internal_text: String = row.try_get("internal_status").map_err(crate::db_error)?;
        let internal_status = InternalStatus::from_str(&internal_text)
            .map_err(|err| crate::corrupt("order internal status", err))?;

        let items_json: serde_json::Value = row.try_get("items").map_err(crate::db_error)?;
        let items: Vec<LineItem> =
            serde_json::from_value(items_json).map_err(|err| crate::corrupt("order items", err))?;

        Ok(Order::restore(
            OrderId::from_uuid(row.try_get::<Uuid, _>("id").map_err(crate::db_error)?),
            UserId::from_uuid(row.try_get::<Uuid, _>("user_id").map_err(crate::db_error)?),
            Money::from_cents(row.try_get("total_price_cents").map_err(crate::db_error)?),
            status,
            internal_status,
            row.try_get::<Option<Uuid>, _>("delivery_id")
                .map_err(crate::db_error)?
                .map(DeliveryId::from_uuid),
            row.try_get("note").map_err(crate::db_error)?,
            items,
            row.try_get::<DateTime<Utc>, _>("created_at")
                .map_err(crate::db_error)?,
            row.try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(crate::db_error)?,
        ))
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find(&self, order_id: OrderId) -> Result<Option<Order>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_ORDER} WHERE id = $1"))
            .bind(order_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(crate::db_error)?;

        row.map(Self::row_to_order).transpose()
    }

    async fn list(&self) -> Result<Vec<Order>, DomainError> {
        let rows = sqlx::query(&format!("{SELECT_ORDER} ORDER BY created_at ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(crate::db_error)?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, DomainError> {
        let rows = sqlx::query(&format!(
            "{SELECT_ORDER} WHERE user_id = $1 ORDER BY created_at ASC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(crate::db_error)?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn list_by_internal_status(
        &self,
        status: InternalStatus,
    ) -> Result<Vec<Order>, DomainError> {
        let rows = sqlx::query(&format!(
            "{SELECT_ORDER} WHERE internal_status = $1 ORDER BY created_at ASC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(crate::db_error)?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let items =
            serde_json::to_value(order.items()).map_err(|err| crate::corrupt("order items", err))?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total_price_cents, status, internal_status,
                                delivery_id, note, items, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(order.id().as_uuid())
        .bind(order.user_id().as_uuid())
        .bind(order.total_price().cents())
        .bind(order.status().as_str())
        .bind(order.internal_status().as_str())
        .bind(order.delivery_id().map(|id| id.as_uuid()))
        .bind(order.note())
        .bind(items)
        .bind(order.created_at())
        .bind(order.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if crate::is_unique_violation(&err) {
                DomainError::Conflict {
                    entity: "order",
                    id: order.id().to_string(),
                }
            } else {
                crate::db_error(err)
            }
        })?;

        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<(), DomainError> {
        let items =
            serde_json::to_value(order.items()).map_err(|err| crate::corrupt("order items", err))?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $2, internal_status = $3, delivery_id = $4, note = $5,
                items = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(order.id().as_uuid())
        .bind(order.status().as_str())
        .bind(order.internal_status().as_str())
        .bind(order.delivery_id().map(|id| id.as_uuid()))
        .bind(order.note())
        .bind(items)
        .bind(order.updated_at())
        .execute(&self.pool)
        .await
        .map_err(crate::db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("order", order.id()));
        }
        Ok(())
    }

    async fn delete(&self, order_id: OrderId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(crate::db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("order", order_id));
        }
        Ok(())
    }
}
