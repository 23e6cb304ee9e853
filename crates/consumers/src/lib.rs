//! Event consumption.
//!
//! The router subscribes to the fulfillment bus and fans envelopes out to
//! registered consumers. Two consumers drive the event-only order
//! transitions (payment succeeded, delivery delivered); the third relays
//! user-facing events to the notification channel. All handling tolerates
//! duplicates and reordering.

pub mod error;
pub mod handlers;
pub mod notify;
pub mod router;

pub use error::RouterError;
pub use handlers::{DeliveryDeliveredConsumer, NotificationRelay, PaymentSucceededConsumer};
pub use notify::{InMemoryNotifier, Notification, NotificationKind, Notifier};
pub use router::{EventConsumer, FulfillmentEventRouter};
