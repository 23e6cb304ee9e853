//! Payment-succeeded consumer: the only way an order reaches `Paid`.

use bus::EventPublisher;
use domain::{
    DeliveryStatusSource, DomainError, FulfillmentEvent, OrderRepository, OrderService,
};

use crate::error::RouterError;
use crate::router::EventConsumer;

/// Applies `Created -> Paid` when a payment-succeeded event arrives.
#[derive(Clone)]
pub struct PaymentSucceededConsumer<R, P, D> {
    orders: OrderService<R, P, D>,
}

impl<R, P, D> PaymentSucceededConsumer<R, P, D> {
    pub fn new(orders: OrderService<R, P, D>) -> Self {
        Self { orders }
    }
}

#[async_trait::async_trait]
impl<R, P, D> EventConsumer for PaymentSucceededConsumer<R, P, D>
where
    R: OrderRepository,
    P: EventPublisher,
    D: DeliveryStatusSource,
{
    fn event_types(&self) -> &'static [&'static str] {
        &["OrderSuccessfullyPaid"]
    }

    async fn handle(&self, event: &FulfillmentEvent) -> Result<(), RouterError> {
        let FulfillmentEvent::OrderSuccessfullyPaid { order_id } = event else {
            return Ok(());
        };

        match self.orders.mark_paid(*order_id).await {
            Ok(_) => Ok(()),
            // Duplicate or out-of-order delivery; the transition no longer
            // applies and the event is spent.
            Err(DomainError::NotFound { .. } | DomainError::InvalidTransition { .. }) => {
                tracing::debug!(%order_id, "payment event ignored, transition not applicable");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
