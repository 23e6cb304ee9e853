//! Delivery lifecycle service.

use async_trait::async_trait;
use bus::EventPublisher;
use common::{DeliveryId, OrderId, UserId};

use crate::error::DomainError;
use crate::events::FulfillmentEvent;
use crate::order::OrderRepository;

use super::entity::{Delivery, NewDelivery};
use super::repository::DeliveryRepository;
use super::status::DeliveryStatus;

/// Read-only view of the order side, used to resolve the owning user when a
/// delivery is canceled.
#[async_trait]
pub trait OrderOwnerSource: Send + Sync {
    async fn owner_of(&self, order_id: OrderId) -> Result<Option<UserId>, DomainError>;
}

/// [`OrderOwnerSource`] backed by an order repository.
#[derive(Clone)]
pub struct OrderOwnerLookup<R>(pub R);

#[async_trait]
impl<R: OrderRepository> OrderOwnerSource for OrderOwnerLookup<R> {
    async fn owner_of(&self, order_id: OrderId) -> Result<Option<UserId>, DomainError> {
        Ok(self.0.find(order_id).await?.map(|o| o.user_id()))
    }
}

/// Service owning the delivery aggregate and its state machine.
#[derive(Clone)]
pub struct DeliveryService<R, P, O> {
    repo: R,
    publisher: P,
    order_owner: O,
}

impl<R, P, O> DeliveryService<R, P, O>
where
    R: DeliveryRepository,
    P: EventPublisher,
    O: OrderOwnerSource,
{
    /// Creates a new delivery service.
    pub fn new(repo: R, publisher: P, order_owner: O) -> Self {
        Self {
            repo,
            publisher,
            order_owner,
        }
    }

    /// Creates a pending delivery for an order.
    #[tracing::instrument(skip(self, delivery), fields(order_id = %delivery.order_id))]
    pub async fn create(&self, delivery: NewDelivery) -> Result<Delivery, DomainError> {
        let delivery = Delivery::new(DeliveryId::new(), delivery);
        self.repo.insert(&delivery).await?;

        metrics::counter!("deliveries_created_total").increment(1);
        tracing::info!(delivery_id = %delivery.id(), "delivery created");
        Ok(delivery)
    }

    /// Advances a delivery's status.
    ///
    /// Reaching `Delivered` records the delivered-at timestamp and publishes
    /// `DeliveryDelivered`. Reaching `Canceled` publishes `DeliveryCanceled`
    /// with the order's owning user resolved through a read-only lookup; the
    /// event still goes out with an absent user id when that lookup fails,
    /// since "cannot notify" is a consumer concern, not a cancellation
    /// failure.
    #[tracing::instrument(skip(self))]
    pub async fn change_status(
        &self,
        delivery_id: DeliveryId,
        target: DeliveryStatus,
    ) -> Result<Delivery, DomainError> {
        let mut delivery = self
            .repo
            .find(delivery_id)
            .await?
            .ok_or_else(|| DomainError::not_found("delivery", delivery_id))?;

        delivery.transition_to(target)?;
        self.repo.update(&delivery).await?;

        match target {
            DeliveryStatus::Delivered => {
                let event = FulfillmentEvent::DeliveryDelivered {
                    order_id: delivery.order_id(),
                };
                self.publisher.publish(event.envelope()?).await?;
                metrics::counter!("deliveries_delivered_total").increment(1);
            }
            DeliveryStatus::Canceled => {
                let user_id = match self.order_owner.owner_of(delivery.order_id()).await {
                    Ok(user_id) => user_id,
                    Err(err) => {
                        tracing::warn!(
                            order_id = %delivery.order_id(),
                            error = %err,
                            "owner lookup failed for canceled delivery"
                        );
                        None
                    }
                };
                let event = FulfillmentEvent::DeliveryCanceled {
                    order_id: delivery.order_id(),
                    user_id,
                };
                self.publisher.publish(event.envelope()?).await?;
                metrics::counter!("deliveries_canceled_total").increment(1);
            }
            _ => {}
        }

        tracing::info!(%delivery_id, status = %target, "delivery status changed");
        Ok(delivery)
    }

    /// Loads a delivery, `None` becoming a not-found error.
    pub async fn get(&self, delivery_id: DeliveryId) -> Result<Delivery, DomainError> {
        self.repo
            .find(delivery_id)
            .await?
            .ok_or_else(|| DomainError::not_found("delivery", delivery_id))
    }

    /// Returns the status of the delivery serving an order, or `None` when
    /// no such delivery exists.
    pub async fn status_by_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<DeliveryStatus>, DomainError> {
        Ok(self.repo.find_by_order(order_id).await?.map(|d| d.status()))
    }
}
