//! Order lifecycle service.

use async_trait::async_trait;
use bus::EventPublisher;
use common::{DeliveryId, OrderId, UserId};

use crate::delivery::{DeliveryRepository, DeliveryStatus};
use crate::error::DomainError;
use crate::events::FulfillmentEvent;

use super::entity::{NewOrder, Order};
use super::repository::OrderRepository;
use super::status::{InternalStatus, OrderStatus};

/// Read-only view of the delivery side, used to gate order completion.
///
/// Implementations must not mutate delivery state; the order service only
/// ever asks "what is the current status of the delivery serving this
/// order", where `None` means no delivery was found.
#[async_trait]
pub trait DeliveryStatusSource: Send + Sync {
    async fn status_for_order(&self, order_id: OrderId)
    -> Result<Option<DeliveryStatus>, DomainError>;
}

/// [`DeliveryStatusSource`] backed by a delivery repository.
#[derive(Clone)]
pub struct DeliveryStatusLookup<R>(pub R);

#[async_trait]
impl<R: DeliveryRepository> DeliveryStatusSource for DeliveryStatusLookup<R> {
    async fn status_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<DeliveryStatus>, DomainError> {
        Ok(self.0.find_by_order(order_id).await?.map(|d| d.status()))
    }
}

/// Service owning the order aggregate and its state machine.
///
/// Every successful public-status transition publishes exactly one event:
/// `OrderCreated` for the creating transition, `OrderStatusChanged` for all
/// later ones. Refused transitions publish nothing and leave the order
/// untouched.
#[derive(Clone)]
pub struct OrderService<R, P, D> {
    repo: R,
    publisher: P,
    delivery_status: D,
}

impl<R, P, D> OrderService<R, P, D>
where
    R: OrderRepository,
    P: EventPublisher,
    D: DeliveryStatusSource,
{
    /// Creates a new order service.
    pub fn new(repo: R, publisher: P, delivery_status: D) -> Self {
        Self {
            repo,
            publisher,
            delivery_status,
        }
    }

    /// Creates an order from a frozen item snapshot and publishes
    /// `OrderCreated`.
    #[tracing::instrument(skip(self, order), fields(user_id = %order.user_id))]
    pub async fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let order_id = OrderId::new();
        let mut order = Order::new(order_id, order)?;
        order.transition_to(OrderStatus::Created)?;
        self.repo.insert(&order).await?;

        let event = FulfillmentEvent::OrderCreated {
            order_id,
            user_id: order.user_id(),
            total_price: order.total_price(),
            note: order.note().map(str::to_string),
            created_at: order.created_at(),
        };
        self.publisher.publish(event.envelope()?).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(%order_id, total = %order.total_price(), "order created");
        Ok(order)
    }

    /// Administrative status change. Targets that are only ever reached
    /// through inbound events (`Paid`, `Completed`) are refused here exactly
    /// like any other invalid transition.
    #[tracing::instrument(skip(self))]
    pub async fn change_status(
        &self,
        order_id: OrderId,
        target: OrderStatus,
    ) -> Result<Order, DomainError> {
        if target.is_event_driven() {
            let order = self.load(order_id).await?;
            return Err(DomainError::invalid_transition(
                "order",
                order.status(),
                target,
            ));
        }
        self.apply_transition(order_id, target).await
    }

    /// Applies the payment-succeeded trigger: `Created -> Paid`.
    #[tracing::instrument(skip(self))]
    pub async fn mark_paid(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.apply_transition(order_id, OrderStatus::Paid).await
    }

    /// Applies the delivery-delivered trigger: `Shipped -> Completed`.
    ///
    /// Succeeds only when the delivery serving this order currently reports
    /// `Delivered`; a missing delivery or any other status is refused the
    /// same way as an invalid transition.
    #[tracing::instrument(skip(self))]
    pub async fn complete(&self, order_id: OrderId) -> Result<Order, DomainError> {
        let order = self.load(order_id).await?;

        let delivery_status = self.delivery_status.status_for_order(order_id).await?;
        if delivery_status != Some(DeliveryStatus::Delivered) {
            tracing::debug!(
                %order_id,
                ?delivery_status,
                "completion refused: delivery not in Delivered state"
            );
            return Err(DomainError::invalid_transition(
                "order",
                order.status(),
                OrderStatus::Completed,
            ));
        }

        self.apply_transition(order_id, OrderStatus::Completed)
            .await
    }

    /// Sets the operational flag. No event is published.
    #[tracing::instrument(skip(self))]
    pub async fn set_internal_status(
        &self,
        order_id: OrderId,
        status: InternalStatus,
    ) -> Result<Order, DomainError> {
        let mut order = self.load(order_id).await?;
        order.set_internal_status(status);
        self.repo.update(&order).await?;
        Ok(order)
    }

    /// Records the delivery serving an order. No event is published.
    #[tracing::instrument(skip(self))]
    pub async fn link_delivery(
        &self,
        order_id: OrderId,
        delivery_id: DeliveryId,
    ) -> Result<(), DomainError> {
        let mut order = self.load(order_id).await?;
        order.link_delivery(delivery_id);
        self.repo.update(&order).await
    }

    /// Loads an order, `None` becoming a not-found error.
    pub async fn get(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.load(order_id).await
    }

    /// Lists all orders.
    pub async fn list(&self) -> Result<Vec<Order>, DomainError> {
        self.repo.list().await
    }

    /// Lists the orders belonging to one user.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, DomainError> {
        self.repo.list_by_user(user_id).await
    }

    /// Lists orders flagged for triage because their delivery leg failed.
    pub async fn list_delivery_failed(&self) -> Result<Vec<Order>, DomainError> {
        self.repo
            .list_by_internal_status(InternalStatus::DeliveryFailed)
            .await
    }

    async fn load(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.repo
            .find(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("order", order_id))
    }

    async fn apply_transition(
        &self,
        order_id: OrderId,
        target: OrderStatus,
    ) -> Result<Order, DomainError> {
        let mut order = self.load(order_id).await?;
        order.transition_to(target)?;
        self.repo.update(&order).await?;

        let event = FulfillmentEvent::OrderStatusChanged {
            order_id,
            user_id: order.user_id(),
            new_status: target,
            updated_at: order.updated_at(),
        };
        self.publisher.publish(event.envelope()?).await?;

        metrics::counter!("order_status_changes_total").increment(1);
        tracing::info!(%order_id, status = %target, "order status changed");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::repository::InMemoryOrderRepository;
    use crate::value_objects::LineItem;
    use bus::InMemoryEventBus;
    use common::Money;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Scriptable delivery-status view for exercising the completion gate.
    #[derive(Clone, Default)]
    struct StubDeliveryStatus(Arc<RwLock<Option<DeliveryStatus>>>);

    impl StubDeliveryStatus {
        async fn set(&self, status: Option<DeliveryStatus>) {
            *self.0.write().await = status;
        }
    }

    #[async_trait]
    impl DeliveryStatusSource for StubDeliveryStatus {
        async fn status_for_order(
            &self,
            _order_id: OrderId,
        ) -> Result<Option<DeliveryStatus>, DomainError> {
            Ok(*self.0.read().await)
        }
    }

    type TestService = OrderService<InMemoryOrderRepository, InMemoryEventBus, StubDeliveryStatus>;

    fn setup() -> (TestService, InMemoryEventBus, StubDeliveryStatus) {
        let repo = InMemoryOrderRepository::new();
        let bus = InMemoryEventBus::new();
        let deliveries = StubDeliveryStatus::default();
        let service = OrderService::new(repo, bus.clone(), deliveries.clone());
        (service, bus, deliveries)
    }

    fn new_order() -> NewOrder {
        NewOrder {
            user_id: UserId::new(),
            note: Some("leave at the door".to_string()),
            items: vec![LineItem::new("SKU-001", "Widget", Money::from_cents(100), 2)],
        }
    }

    async fn order_in_status(service: &TestService, target: OrderStatus) -> Order {
        let order = service.create(new_order()).await.unwrap();
        let path = [
            OrderStatus::Paid,
            OrderStatus::Accepted,
            OrderStatus::Shipped,
        ];
        let mut current = order;
        for step in path {
            if current.status() == target {
                break;
            }
            current = match step {
                OrderStatus::Paid => service.mark_paid(current.id()).await.unwrap(),
                other => service.change_status(current.id(), other).await.unwrap(),
            };
        }
        assert_eq!(current.status(), target);
        current
    }

    #[tokio::test]
    async fn create_publishes_order_created_and_derives_total() {
        let (service, bus, _) = setup();

        let order = service.create(new_order()).await.unwrap();

        assert_eq!(order.status(), OrderStatus::Created);
        assert_eq!(order.total_price().cents(), 200);
        assert_eq!(bus.published_of_type("OrderCreated").await.len(), 1);
        assert_eq!(bus.published_count().await, 1);
    }

    #[tokio::test]
    async fn admin_cannot_set_event_driven_targets() {
        let (service, bus, _) = setup();
        let order = service.create(new_order()).await.unwrap();

        for target in [OrderStatus::Paid, OrderStatus::Completed] {
            let err = service.change_status(order.id(), target).await.unwrap_err();
            assert!(matches!(err, DomainError::InvalidTransition { .. }));
        }

        assert_eq!(
            service.get(order.id()).await.unwrap().status(),
            OrderStatus::Created
        );
        assert_eq!(bus.published_of_type("OrderStatusChanged").await.len(), 0);
    }

    #[tokio::test]
    async fn mark_paid_advances_created_order() {
        let (service, bus, _) = setup();
        let order = service.create(new_order()).await.unwrap();

        let order = service.mark_paid(order.id()).await.unwrap();

        assert_eq!(order.status(), OrderStatus::Paid);
        assert_eq!(bus.published_of_type("OrderStatusChanged").await.len(), 1);
    }

    #[tokio::test]
    async fn mark_paid_refused_outside_created() {
        let (service, bus, _) = setup();
        let order = service.create(new_order()).await.unwrap();
        service.mark_paid(order.id()).await.unwrap();

        let err = service.mark_paid(order.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(bus.published_of_type("OrderStatusChanged").await.len(), 1);
    }

    #[tokio::test]
    async fn complete_requires_delivered_delivery() {
        let (service, bus, deliveries) = setup();
        let order = order_in_status(&service, OrderStatus::Shipped).await;

        // No delivery at all.
        let err = service.complete(order.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        // Delivery exists but is not delivered yet.
        deliveries.set(Some(DeliveryStatus::InProgress)).await;
        let err = service.complete(order.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        // Delivered: completion goes through.
        deliveries.set(Some(DeliveryStatus::Delivered)).await;
        let order = service.complete(order.id()).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Completed);

        // Shipped -> Completed plus the three earlier transitions.
        assert_eq!(bus.published_of_type("OrderStatusChanged").await.len(), 4);
    }

    #[tokio::test]
    async fn complete_refused_when_order_not_shipped() {
        let (service, _, deliveries) = setup();
        deliveries.set(Some(DeliveryStatus::Delivered)).await;
        let order = service.create(new_order()).await.unwrap();

        let err = service.complete(order.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn admin_change_on_completed_order_is_refused_unchanged() {
        let (service, _, deliveries) = setup();
        let order = order_in_status(&service, OrderStatus::Shipped).await;
        deliveries.set(Some(DeliveryStatus::Delivered)).await;
        service.complete(order.id()).await.unwrap();

        let err = service
            .change_status(order.id(), OrderStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(
            service.get(order.id()).await.unwrap().status(),
            OrderStatus::Completed
        );
    }

    #[tokio::test]
    async fn missing_order_is_not_found() {
        let (service, _, _) = setup();
        let err = service.get(OrderId::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = service
            .change_status(OrderId::new(), OrderStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn internal_status_flags_show_up_in_triage_listing() {
        let (service, bus, _) = setup();
        let order = service.create(new_order()).await.unwrap();
        let other = service.create(new_order()).await.unwrap();

        service
            .set_internal_status(order.id(), InternalStatus::DeliveryFailed)
            .await
            .unwrap();

        let flagged = service.list_delivery_failed().await.unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].id(), order.id());
        assert_ne!(flagged[0].id(), other.id());

        // Flagging is operational, not a lifecycle transition.
        assert_eq!(bus.published_of_type("OrderStatusChanged").await.len(), 0);
    }

    #[tokio::test]
    async fn list_by_user_returns_own_orders() {
        let (service, _, _) = setup();
        let order = service.create(new_order()).await.unwrap();
        service.create(new_order()).await.unwrap();

        let mine = service.list_by_user(order.user_id()).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
