//! The checkout orchestrator.

use common::{CourierId, UserId};
use domain::{Address, CartRepository, Contact};

use crate::chain::{ChainRequest, FulfillmentChain};
use crate::error::CheckoutError;
use crate::outcome::{CheckoutOutcome, CheckoutSuccess, FulfillmentFailure};
use crate::services::AvailabilityGate;

/// Caller-supplied half of a checkout. The items come from the cart.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub courier_id: CourierId,
    pub note: Option<String>,
    pub contact: Contact,
    pub address: Address,
}

/// Drives one checkout attempt end to end.
///
/// The stock check runs first and is the only branch that leaves the cart
/// alive. Once an attempt proceeds past it, the cart is deleted no matter
/// how the downstream chain fares; its items are already frozen into the
/// order, and a surviving cart could be checked out twice.
#[derive(Clone)]
pub struct CheckoutOrchestrator<C, A, F> {
    carts: C,
    availability: A,
    chain: F,
}

impl<C, A, F> CheckoutOrchestrator<C, A, F>
where
    C: CartRepository,
    A: AvailabilityGate,
    F: FulfillmentChain,
{
    pub fn new(carts: C, availability: A, chain: F) -> Self {
        Self {
            carts,
            availability,
            chain,
        }
    }

    /// Runs a checkout for the user's current cart.
    #[tracing::instrument(skip(self, request))]
    pub async fn checkout(
        &self,
        user_id: UserId,
        request: CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let started = std::time::Instant::now();

        let cart = self
            .carts
            .find_by_user(user_id)
            .await?
            .filter(|cart| !cart.is_empty())
            .ok_or(CheckoutError::CartNotFound(user_id))?;

        let unavailable = self.availability.check_availability(cart.items()).await?;
        if !unavailable.is_empty() {
            metrics::counter!("checkout_stock_shortages_total").increment(1);
            tracing::info!(%user_id, shortages = unavailable.len(), "checkout stopped by stock check");
            return Ok(CheckoutOutcome::Completed(CheckoutSuccess::out_of_stock(
                unavailable,
            )));
        }

        let chain_result = self
            .chain
            .run(ChainRequest {
                user_id,
                courier_id: request.courier_id,
                note: request.note,
                contact: request.contact,
                address: request.address,
                items: cart.items().to_vec(),
            })
            .await;

        // Past the stock check the cart never survives, not even when the
        // chain errored. A delete failure must not mask the checkout result.
        if let Err(err) = self.carts.delete_by_user(user_id).await {
            tracing::error!(%user_id, error = %err, "failed to delete cart after checkout");
        }

        let receipt = chain_result?;
        let outcome = match (receipt.delivery_id, &receipt.checkout_url) {
            (Some(_), Some(url)) => {
                CheckoutOutcome::Completed(CheckoutSuccess::with_checkout_url(url.clone()))
            }
            (Some(_), None) => CheckoutOutcome::Failed(FulfillmentFailure::PaymentCheckoutUrlNotCreated {
                order_id: receipt.order_id,
            }),
            (None, Some(_)) => CheckoutOutcome::Failed(FulfillmentFailure::DeliveryNotCreated {
                order_id: receipt.order_id,
            }),
            (None, None) => {
                CheckoutOutcome::Failed(FulfillmentFailure::DeliveryAndPaymentCheckoutNotCreated {
                    order_id: receipt.order_id,
                })
            }
        };

        match &outcome {
            CheckoutOutcome::Completed(_) => {
                tracing::info!(%user_id, order_id = %receipt.order_id, "checkout completed");
            }
            CheckoutOutcome::Failed(failure) => {
                metrics::counter!("checkout_failures_total", "reason" => failure.label())
                    .increment(1);
                tracing::warn!(
                    %user_id,
                    order_id = %receipt.order_id,
                    reason = failure.label(),
                    "checkout partially fulfilled"
                );
            }
        }
        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());

        Ok(outcome)
    }
}
