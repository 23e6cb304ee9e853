//! Shared application state and its default in-memory wiring.

use std::sync::Arc;

use bus::InMemoryEventBus;
use checkout::{
    CartService, CheckoutOrchestrator, InMemoryAvailabilityGate, InMemoryPaymentGateway,
    OrderCreationChain,
};
use consumers::{
    DeliveryDeliveredConsumer, FulfillmentEventRouter, InMemoryNotifier, NotificationRelay,
    PaymentSucceededConsumer,
};
use domain::{
    DeliveryService, DeliveryStatusLookup, InMemoryCartRepository, InMemoryDeliveryRepository,
    InMemoryOrderRepository, OrderOwnerLookup, OrderService,
};

pub type AppOrderService = OrderService<
    InMemoryOrderRepository,
    InMemoryEventBus,
    DeliveryStatusLookup<InMemoryDeliveryRepository>,
>;
pub type AppDeliveryService = DeliveryService<
    InMemoryDeliveryRepository,
    InMemoryEventBus,
    OrderOwnerLookup<InMemoryOrderRepository>,
>;
pub type AppChain = OrderCreationChain<AppOrderService, AppDeliveryService, InMemoryPaymentGateway>;
pub type AppOrchestrator =
    CheckoutOrchestrator<InMemoryCartRepository, InMemoryAvailabilityGate, AppChain>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub orchestrator: AppOrchestrator,
    pub carts: CartService<InMemoryCartRepository>,
    pub orders: AppOrderService,
    pub deliveries: AppDeliveryService,
    pub availability: InMemoryAvailabilityGate,
    pub payments: InMemoryPaymentGateway,
    pub notifier: InMemoryNotifier,
    pub bus: InMemoryEventBus,
}

/// Wires the in-memory stack: repositories, services, orchestrator and the
/// event router with all three consumers registered. The router is returned
/// unstarted; the caller decides where its subscription loop runs.
pub fn create_default_state() -> (Arc<AppState>, FulfillmentEventRouter) {
    let cart_repo = InMemoryCartRepository::new();
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

    let availability = InMemoryAvailabilityGate::new();
    let payments = InMemoryPaymentGateway::new();
    let chain = OrderCreationChain::new(orders.clone(), deliveries.clone(), payments.clone());
    let orchestrator = CheckoutOrchestrator::new(cart_repo.clone(), availability.clone(), chain);

    let notifier = InMemoryNotifier::new();
    let mut router = FulfillmentEventRouter::new();
    router.register(Arc::new(PaymentSucceededConsumer::new(orders.clone())));
    router.register(Arc::new(DeliveryDeliveredConsumer::new(orders.clone())));
    router.register(Arc::new(NotificationRelay::new(notifier.clone())));

    let state = Arc::new(AppState {
        orchestrator,
        carts: CartService::new(cart_repo),
        orders,
        deliveries,
        availability,
        payments,
        notifier,
        bus,
    });

    (state, router)
}
