//! Notification collaborator seam.

use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, UserId};
use tokio::sync::RwLock;

use crate::error::RouterError;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    OrderCreated,
    OrderStatusChanged,
    DeliveryCanceled,
}

/// A user-facing message derived from a fulfillment event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub user_id: UserId,
    pub order_id: OrderId,
    pub kind: NotificationKind,
    pub body: String,
}

/// Outbound messaging channel. Real implementations push to mail, SMS or
/// similar; failures are the channel's problem, not the fulfillment flow's.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), RouterError>;
}

/// In-memory notifier recording everything it was asked to send.
#[derive(Clone, Default)]
pub struct InMemoryNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), RouterError> {
        self.sent.write().await.push(notification);
        Ok(())
    }
}
