//! Postgres delivery repository.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CourierId, DeliveryId, OrderId};
use domain::{Address, Contact, Delivery, DeliveryRepository, DeliveryStatus, DomainError};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

const SELECT_DELIVERY: &str = "SELECT id, order_id, courier_id, status, delivered_at, contact, \
     address, created_at, updated_at FROM deliveries";

/// PostgreSQL-backed [`DeliveryRepository`].
#[derive(Clone)]
pub struct PostgresDeliveryRepository {
    pool: PgPool,
}

impl PostgresDeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_delivery(row: PgRow) -> Result<Delivery, DomainError> {
        let status_text: String = row.try_get("status").map_err(crate::db_error)?;
        let status = DeliveryStatus::from_str(&status_text)
            .map_err(|err| crate::corrupt("delivery status", err))?;

        let contact_json: serde_json::Value = row.try_get("contact").map_err(crate::db_error)?;
        let contact: Contact = serde_json::from_value(contact_json)
            .map_err(|err| crate::corrupt("delivery contact", err))?;
        let address_json: serde_json::Value = row.try_get("address").map_err(crate::db_error)?;
        let address: Address = serde_json::from_value(address_json)
            .map_err(|err| crate::corrupt("delivery address", err))?;

        Ok(Delivery::restore(
            DeliveryId::from_uuid(row.try_get::<Uuid, _>("id").map_err(crate::db_error)?),
            OrderId::from_uuid(row.try_get::<Uuid, _>("order_id").map_err(crate::db_error)?),
            CourierId::from_uuid(row.try_get::<Uuid, _>("courier_id").map_err(crate::db_error)?),
            status,
            row.try_get::<Option<DateTime<Utc>>, _>("delivered_at")
                .map_err(crate::db_error)?,
            contact,
            address,
            row.try_get::<DateTime<Utc>, _>("created_at")
                .map_err(crate::db_error)?,
            row.try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(crate::db_error)?,
        ))
    }
}

#[async_trait]
impl DeliveryRepository for PostgresDeliveryRepository {
    async fn find(&self, delivery_id: DeliveryId) -> Result<Option<Delivery>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_DELIVERY} WHERE id = $1"))
            .bind(delivery_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(crate::db_error)?;

        row.map(Self::row_to_delivery).transpose()
    }

    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<Delivery>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_DELIVERY} WHERE order_id = $1"))
            .bind(order_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(crate::db_error)?;

        row.map(Self::row_to_delivery).transpose()
    }

    async fn insert(&self, delivery: &Delivery) -> Result<(), DomainError> {
        let contact = serde_json::to_value(delivery.contact())
            .map_err(|err| crate::corrupt("delivery contact", err))?;
        let address = serde_json::to_value(delivery.address())
            .map_err(|err| crate::corrupt("delivery address", err))?;

        sqlx::query(
            r#"
            INSERT INTO deliveries (id, order_id, courier_id, status, delivered_at,
                                    contact, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(delivery.id().as_uuid())
        .bind(delivery.order_id().as_uuid())
        .bind(delivery.courier_id().as_uuid())
        .bind(delivery.status().as_str())
        .bind(delivery.delivered_at())
        .bind(contact)
        .bind(address)
        .bind(delivery.created_at())
        .bind(delivery.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if crate::is_unique_violation(&err) {
                DomainError::Conflict {
                    entity: "delivery",
                    id: delivery.id().to_string(),
                }
            } else {
                crate::db_error(err)
            }
        })?;

        Ok(())
    }

    async fn update(&self, delivery: &Delivery) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE deliveries
            SET courier_id = $2, status = $3, delivered_at = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(delivery.id().as_uuid())
        .bind(delivery.courier_id().as_uuid())
        .bind(delivery.status().as_str())
        .bind(delivery.delivered_at())
        .bind(delivery.updated_at())
        .execute(&self.pool)
        .await
        .map_err(crate::db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("delivery", delivery.id()));
        }
        Ok(())
    }

    async fn delete(&self, delivery_id: DeliveryId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM deliveries WHERE id = $1")
            .bind(delivery_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(crate::db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("delivery", delivery_id));
        }
        Ok(())
    }
}
