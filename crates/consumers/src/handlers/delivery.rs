//! Delivery-delivered consumer: the only way an order reaches `Completed`.

use bus::EventPublisher;
use domain::{
    DeliveryStatusSource, DomainError, FulfillmentEvent, OrderRepository, OrderService,
};

use crate::error::RouterError;
use crate::router::EventConsumer;

/// Applies the completion path when a delivery reports delivered.
///
/// The order service re-checks the delivery's current status before
/// completing, so a stale or duplicated event cannot complete an order whose
/// delivery has since moved elsewhere.
#[derive(Clone)]
pub struct DeliveryDeliveredConsumer<R, P, D> {
    orders: OrderService<R, P, D>,
}

impl<R, P, D> DeliveryDeliveredConsumer<R, P, D> {
    pub fn new(orders: OrderService<R, P, D>) -> Self {
        Self { orders }
    }
}

#[async_trait::async_trait]
impl<R, P, D> EventConsumer for DeliveryDeliveredConsumer<R, P, D>
where
    R: OrderRepository,
    P: EventPublisher,
    D: DeliveryStatusSource,
{
    fn event_types(&self) -> &'static [&'static str] {
        &["DeliveryDelivered"]
    }

    async fn handle(&self, event: &FulfillmentEvent) -> Result<(), RouterError> {
        let FulfillmentEvent::DeliveryDelivered { order_id } = event else {
            return Ok(());
        };

        match self.orders.complete(*order_id).await {
            Ok(_) => Ok(()),
            Err(DomainError::NotFound { .. } | DomainError::InvalidTransition { .. }) => {
                tracing::debug!(%order_id, "delivery event ignored, transition not applicable");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
