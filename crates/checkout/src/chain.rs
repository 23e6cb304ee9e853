//! The order-creation chain: order, then delivery, then payment session.

use async_trait::async_trait;
use bus::EventPublisher;
use common::{CourierId, DeliveryId, OrderId, UserId};
use domain::{
    Address, Contact, Delivery, DeliveryRepository, DeliveryService, DeliveryStatusSource,
    DomainError, InternalStatus, LineItem, NewDelivery, NewOrder, Order, OrderOwnerSource,
    OrderRepository, OrderService,
};

use crate::error::CheckoutError;
use crate::services::PaymentGateway;

/// Order-side writes the chain needs.
#[async_trait]
pub trait OrderCreation: Send + Sync {
    async fn create_order(&self, order: NewOrder) -> Result<Order, DomainError>;
    async fn attach_delivery(
        &self,
        order_id: OrderId,
        delivery_id: DeliveryId,
    ) -> Result<(), DomainError>;
    async fn flag_delivery_failed(&self, order_id: OrderId) -> Result<(), DomainError>;
}

#[async_trait]
impl<R, P, D> OrderCreation for OrderService<R, P, D>
where
    R: OrderRepository,
    P: EventPublisher,
    D: DeliveryStatusSource,
{
    async fn create_order(&self, order: NewOrder) -> Result<Order, DomainError> {
        self.create(order).await
    }

    async fn attach_delivery(
        &self,
        order_id: OrderId,
        delivery_id: DeliveryId,
    ) -> Result<(), DomainError> {
        self.link_delivery(order_id, delivery_id).await
    }

    async fn flag_delivery_failed(&self, order_id: OrderId) -> Result<(), DomainError> {
        self.set_internal_status(order_id, InternalStatus::DeliveryFailed)
            .await
            .map(|_| ())
    }
}

/// Delivery-side write the chain needs.
#[async_trait]
pub trait DeliveryCreation: Send + Sync {
    async fn create_delivery(&self, delivery: NewDelivery) -> Result<Delivery, DomainError>;
}

#[async_trait]
impl<R, P, O> DeliveryCreation for DeliveryService<R, P, O>
where
    R: DeliveryRepository,
    P: EventPublisher,
    O: OrderOwnerSource,
{
    async fn create_delivery(&self, delivery: NewDelivery) -> Result<Delivery, DomainError> {
        self.create(delivery).await
    }
}

/// Everything the chain needs to know, snapshotted from the cart and the
/// checkout request. The order total is derived from the items downstream.
#[derive(Debug, Clone)]
pub struct ChainRequest {
    pub user_id: UserId,
    pub courier_id: CourierId,
    pub note: Option<String>,
    pub contact: Contact,
    pub address: Address,
    pub items: Vec<LineItem>,
}

/// What actually came back from the chain. `order_id` is always present;
/// absence of the other two is what the orchestrator classifies on.
#[derive(Debug, Clone)]
pub struct ChainReceipt {
    pub order_id: OrderId,
    pub delivery_id: Option<DeliveryId>,
    pub checkout_url: Option<String>,
}

/// The downstream chain as one logical call.
#[async_trait]
pub trait FulfillmentChain: Send + Sync {
    async fn run(&self, request: ChainRequest) -> Result<ChainReceipt, CheckoutError>;
}

/// Production chain: order service, then delivery service, then payment
/// gateway, strictly in that order.
///
/// The order leg is load-bearing; its failure aborts the chain. The delivery
/// and payment legs degrade to absence in the receipt instead of erroring,
/// and a failed delivery leg flags the order for operator triage. Nothing
/// here rolls anything back.
#[derive(Clone)]
pub struct OrderCreationChain<O, D, P> {
    orders: O,
    deliveries: D,
    payments: P,
}

impl<O, D, P> OrderCreationChain<O, D, P>
where
    O: OrderCreation,
    D: DeliveryCreation,
    P: PaymentGateway,
{
    pub fn new(orders: O, deliveries: D, payments: P) -> Self {
        Self {
            orders,
            deliveries,
            payments,
        }
    }

    async fn delivery_leg(&self, order_id: OrderId, request: &ChainRequest) -> Option<DeliveryId> {
        let new_delivery = NewDelivery {
            order_id,
            courier_id: request.courier_id,
            contact: request.contact.clone(),
            address: request.address.clone(),
        };
        match self.deliveries.create_delivery(new_delivery).await {
            Ok(delivery) => {
                if let Err(err) = self.orders.attach_delivery(order_id, delivery.id()).await {
                    tracing::warn!(%order_id, error = %err, "failed to record delivery on order");
                }
                Some(delivery.id())
            }
            Err(err) => {
                tracing::warn!(%order_id, error = %err, "delivery creation failed");
                if let Err(err) = self.orders.flag_delivery_failed(order_id).await {
                    tracing::error!(%order_id, error = %err, "failed to flag order as delivery-failed");
                }
                None
            }
        }
    }

    async fn payment_leg(&self, order_id: OrderId, items: &[LineItem]) -> Option<String> {
        match self.payments.create_checkout_session(order_id, items).await {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(%order_id, error = %err, "payment session creation failed");
                None
            }
        }
    }
}

#[async_trait]
impl<O, D, P> FulfillmentChain for OrderCreationChain<O, D, P>
where
    O: OrderCreation,
    D: DeliveryCreation,
    P: PaymentGateway,
{
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id))]
    async fn run(&self, request: ChainRequest) -> Result<ChainReceipt, CheckoutError> {
        let order = self
            .orders
            .create_order(NewOrder {
                user_id: request.user_id,
                note: request.note.clone(),
                items: request.items.clone(),
            })
            .await?;
        let order_id = order.id();

        let delivery_id = self.delivery_leg(order_id, &request).await;
        let checkout_url = self.payment_leg(order_id, &request.items).await;

        Ok(ChainReceipt {
            order_id,
            delivery_id,
            checkout_url,
        })
    }
}
