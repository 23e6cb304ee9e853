//! Relay from fulfillment events to the notification channel.

use domain::FulfillmentEvent;

use crate::error::RouterError;
use crate::notify::{Notification, NotificationKind, Notifier};
use crate::router::EventConsumer;

/// Forwards user-facing events to a [`Notifier`].
///
/// A canceled-delivery event may arrive without a user id when the owning
/// order could not be resolved at publish time; that means "cannot notify"
/// and the event is dropped here, not treated as an error.
#[derive(Clone)]
pub struct NotificationRelay<N> {
    notifier: N,
}

impl<N> NotificationRelay<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

#[async_trait::async_trait]
impl<N: Notifier> EventConsumer for NotificationRelay<N> {
    fn event_types(&self) -> &'static [&'static str] {
        &["OrderCreated", "OrderStatusChanged", "DeliveryCanceled"]
    }

    async fn handle(&self, event: &FulfillmentEvent) -> Result<(), RouterError> {
        let notification = match event {
            FulfillmentEvent::OrderCreated {
                order_id,
                user_id,
                total_price,
                ..
            } => Notification {
                user_id: *user_id,
                order_id: *order_id,
                kind: NotificationKind::OrderCreated,
                body: format!("your order for {total_price} has been created"),
            },
            FulfillmentEvent::OrderStatusChanged {
                order_id,
                user_id,
                new_status,
                ..
            } => Notification {
                user_id: *user_id,
                order_id: *order_id,
                kind: NotificationKind::OrderStatusChanged,
                body: format!("your order is now {new_status}"),
            },
            FulfillmentEvent::DeliveryCanceled { order_id, user_id } => {
                let Some(user_id) = user_id else {
                    tracing::debug!(%order_id, "canceled delivery has no resolvable user, skipping");
                    return Ok(());
                };
                Notification {
                    user_id: *user_id,
                    order_id: *order_id,
                    kind: NotificationKind::DeliveryCanceled,
                    body: "the delivery for your order was canceled".to_string(),
                }
            }
            _ => return Ok(()),
        };

        metrics::counter!("notifications_sent_total").increment(1);
        self.notifier.notify(notification).await
    }
}
