//! End-to-end event flow: bus, router, consumers and domain services.

use std::sync::Arc;
use std::time::Duration;

use bus::{EventPublisher, InMemoryEventBus};
use common::{CourierId, Money, OrderId, UserId};
use consumers::{
    DeliveryDeliveredConsumer, FulfillmentEventRouter, InMemoryNotifier, NotificationKind,
    NotificationRelay, PaymentSucceededConsumer,
};
use domain::{
    Address, Contact, DeliveryService, DeliveryStatus, DeliveryStatusLookup, FulfillmentEvent,
    InMemoryDeliveryRepository, InMemoryOrderRepository, LineItem, NewDelivery, NewOrder,
    OrderOwnerLookup, OrderService, OrderStatus,
};

type Orders = OrderService<
    InMemoryOrderRepository,
    InMemoryEventBus,
    DeliveryStatusLookup<InMemoryDeliveryRepository>,
>;
type Deliveries = DeliveryService<
    InMemoryDeliveryRepository,
    InMemoryEventBus,
    OrderOwnerLookup<InMemoryOrderRepository>,
>;

struct TestHarness {
    bus: InMemoryEventBus,
    orders: Orders,
    deliveries: Deliveries,
    notifier: InMemoryNotifier,
}

impl TestHarness {
    fn new() -> Self {
        let order_repo = InMemoryOrderRepository::new();
        let delivery_repo = InMemoryDeliveryRepository::new();
        let bus = InMemoryEventBus::new();
        let orders = OrderService::new(
            order_repo.clone(),
            bus.clone(),
            DeliveryStatusLookup(delivery_repo.clone()),
        );
        let deliveries = DeliveryService::new(
            delivery_repo,
            bus.clone(),
            OrderOwnerLookup(order_repo),
        );
        let notifier = InMemoryNotifier::new();

        let mut router = FulfillmentEventRouter::new();
        router.register(Arc::new(PaymentSucceededConsumer::new(orders.clone())));
        router.register(Arc::new(DeliveryDeliveredConsumer::new(orders.clone())));
        router.register(Arc::new(NotificationRelay::new(notifier.clone())));
        tokio::spawn(router.run(bus.subscribe()));

        Self {
            bus,
            orders,
            deliveries,
            notifier,
        }
    }

    async fn order(&self) -> OrderId {
        self.orders
            .create(NewOrder {
                user_id: UserId::new(),
                note: None,
                items: vec![LineItem::new("SKU-001", "Widget", Money::from_cents(1000), 1)],
            })
            .await
            .unwrap()
            .id()
    }

    async fn delivery_for(&self, order_id: OrderId) -> common::DeliveryId {
        self.deliveries
            .create(NewDelivery {
                order_id,
                courier_id: CourierId::new(),
                contact: Contact {
                    name: "Jo Smith".to_string(),
                    phone: "+1 555 0100".to_string(),
                },
                address: Address {
                    street: "1 Main St".to_string(),
                    city: "Springfield".to_string(),
                    postal_code: "12345".to_string(),
                },
            })
            .await
            .unwrap()
            .id()
    }

    async fn wait_for_status(&self, order_id: OrderId, status: OrderStatus) {
        for _ in 0..200 {
            if self.orders.get(order_id).await.unwrap().status() == status {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("order {order_id} never reached {status}");
    }
}

#[tokio::test]
async fn payment_and_delivery_events_drive_the_order_to_completed() {
    let h = TestHarness::new();
    let order_id = h.order().await;
    let delivery_id = h.delivery_for(order_id).await;

    let paid = FulfillmentEvent::OrderSuccessfullyPaid { order_id };
    h.bus.publish(paid.envelope().unwrap()).await.unwrap();
    h.wait_for_status(order_id, OrderStatus::Paid).await;

    h.orders
        .change_status(order_id, OrderStatus::Accepted)
        .await
        .unwrap();
    h.orders
        .change_status(order_id, OrderStatus::Shipped)
        .await
        .unwrap();

    h.deliveries
        .change_status(delivery_id, DeliveryStatus::InProgress)
        .await
        .unwrap();
    h.deliveries
        .change_status(delivery_id, DeliveryStatus::Delivered)
        .await
        .unwrap();

    h.wait_for_status(order_id, OrderStatus::Completed).await;
}

#[tokio::test]
async fn duplicate_payment_events_apply_once() {
    let h = TestHarness::new();
    let order_id = h.order().await;

    let paid = FulfillmentEvent::OrderSuccessfullyPaid { order_id };
    for _ in 0..3 {
        h.bus.publish(paid.envelope().unwrap()).await.unwrap();
    }

    h.wait_for_status(order_id, OrderStatus::Paid).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        h.orders.get(order_id).await.unwrap().status(),
        OrderStatus::Paid
    );
    // One OrderStatusChanged from the single applied transition.
    assert_eq!(h.bus.published_of_type("OrderStatusChanged").await.len(), 1);
}

#[tokio::test]
async fn delivered_event_before_shipping_leaves_the_order_alone() {
    let h = TestHarness::new();
    let order_id = h.order().await;
    let delivery_id = h.delivery_for(order_id).await;

    h.deliveries
        .change_status(delivery_id, DeliveryStatus::InProgress)
        .await
        .unwrap();
    h.deliveries
        .change_status(delivery_id, DeliveryStatus::Delivered)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        h.orders.get(order_id).await.unwrap().status(),
        OrderStatus::Created
    );
}

#[tokio::test]
async fn canceled_delivery_notifies_the_order_owner() {
    let h = TestHarness::new();
    let order_id = h.order().await;
    let delivery_id = h.delivery_for(order_id).await;

    h.deliveries
        .change_status(delivery_id, DeliveryStatus::Canceled)
        .await
        .unwrap();

    for _ in 0..200 {
        let sent = h.notifier.sent().await;
        if sent
            .iter()
            .any(|n| n.kind == NotificationKind::DeliveryCanceled && n.order_id == order_id)
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("cancellation notification never arrived");
}
