//! Payment gateway trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::LineItem;

use crate::error::CheckoutError;

/// Creates a hosted payment session for an order.
///
/// `Ok(None)` means the provider answered but produced no redirect URL; the
/// chain treats that the same as a failed payment leg.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        order_id: OrderId,
        items: &[LineItem],
    ) -> Result<Option<String>, CheckoutError>;
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    sessions: Vec<OrderId>,
    fail_on_create: bool,
    omit_url: bool,
}

/// In-memory payment gateway for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to error on the next session creation.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Configures the gateway to answer without a redirect URL.
    pub fn set_omit_url(&self, omit: bool) {
        self.state.write().unwrap().omit_url = omit;
    }

    /// Returns the number of sessions created so far.
    pub fn session_count(&self) -> usize {
        self.state.read().unwrap().sessions.len()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_checkout_session(
        &self,
        order_id: OrderId,
        _items: &[LineItem],
    ) -> Result<Option<String>, CheckoutError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(CheckoutError::Payment(
                "payment provider unavailable".to_string(),
            ));
        }

        state.sessions.push(order_id);
        if state.omit_url {
            return Ok(None);
        }
        Ok(Some(format!("https://pay.example.com/session/{order_id}")))
    }
}
