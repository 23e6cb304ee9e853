//! The consumers registered with the router.

pub mod delivery;
pub mod notification;
pub mod payment;

pub use delivery::DeliveryDeliveredConsumer;
pub use notification::NotificationRelay;
pub use payment::PaymentSucceededConsumer;
