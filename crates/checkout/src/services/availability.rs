//! Product availability gate trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ProductId;
use domain::LineItem;

use crate::error::CheckoutError;
use crate::outcome::InsufficientProduct;

/// Stock check performed before any checkout write.
///
/// Returns the under-stocked subset of the requested items; an empty vector
/// means everything is available at the requested quantities.
#[async_trait]
pub trait AvailabilityGate: Send + Sync {
    async fn check_availability(
        &self,
        items: &[LineItem],
    ) -> Result<Vec<InsufficientProduct>, CheckoutError>;
}

#[derive(Debug, Default)]
struct InMemoryAvailabilityState {
    stock: HashMap<ProductId, u32>,
    fail_on_check: bool,
}

/// In-memory availability gate for tests and local runs. Unknown products
/// count as zero stock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAvailabilityGate {
    state: Arc<RwLock<InMemoryAvailabilityState>>,
}

impl InMemoryAvailabilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the available quantity for a product.
    pub fn set_stock(&self, product_id: impl Into<ProductId>, quantity: u32) {
        self.state
            .write()
            .unwrap()
            .stock
            .insert(product_id.into(), quantity);
    }

    /// Configures the gate to fail its next checks outright.
    pub fn set_fail_on_check(&self, fail: bool) {
        self.state.write().unwrap().fail_on_check = fail;
    }
}

#[async_trait]
impl AvailabilityGate for InMemoryAvailabilityGate {
    async fn check_availability(
        &self,
        items: &[LineItem],
    ) -> Result<Vec<InsufficientProduct>, CheckoutError> {
        let state = self.state.read().unwrap();

        if state.fail_on_check {
            return Err(CheckoutError::Availability(
                "inventory service unavailable".to_string(),
            ));
        }

        Ok(items
            .iter()
            .filter_map(|item| {
                let in_stock = state.stock.get(&item.product_id).copied().unwrap_or(0);
                (in_stock < item.quantity).then(|| InsufficientProduct {
                    product_id: item.product_id.clone(),
                    title: item.product_name.clone(),
                    quantity_in_stock: in_stock,
                })
            })
            .collect())
    }
}
