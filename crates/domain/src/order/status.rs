//! Order status state machines.

use serde::{Deserialize, Serialize};

use crate::error::UnknownStatus;

/// Customer-facing order status.
///
/// Allowed transitions:
/// ```text
/// Draft ──► Created ──► Paid ──► Accepted ──► Shipped ──► Completed
///              │          │
///              ▼          ▼
///          Cancelled   Rejected
/// ```
/// No target is reachable from more than one source. `Created -> Paid` and
/// `Shipped -> Completed` are driven only by inbound events (payment
/// succeeded, delivery delivered); every other transition is an
/// administrative command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order is being assembled and has not been recorded yet.
    #[default]
    Draft,

    /// Order row exists, awaiting payment.
    Created,

    /// Payment confirmed.
    Paid,

    /// Accepted for fulfillment by an operator.
    Accepted,

    /// Rejected by an operator after payment.
    Rejected,

    /// Handed to the courier.
    Shipped,

    /// Delivered and closed (terminal).
    Completed,

    /// Cancelled before payment (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the transition from `self` to `target` is allowed.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            (Draft, Created)
                | (Created, Paid)
                | (Paid, Accepted)
                | (Accepted, Shipped)
                | (Shipped, Completed)
                | (Created, Cancelled)
                | (Paid, Rejected)
        )
    }

    /// Returns true if this status is driven only by an inbound event and
    /// must never be set by an administrative command.
    pub fn is_event_driven(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Completed)
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "Draft",
            OrderStatus::Created => "Created",
            OrderStatus::Paid => "Paid",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// All statuses, for exhaustive transition checks in tests.
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Draft,
        OrderStatus::Created,
        OrderStatus::Paid,
        OrderStatus::Accepted,
        OrderStatus::Rejected,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Operational flag kept separate from the customer-facing status.
///
/// `DeliveryFailed` marks orders whose delivery leg failed during checkout
/// so operators can triage them; the fulfillment chain does not roll back a
/// created order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InternalStatus {
    /// Nothing needs operator attention.
    #[default]
    Normal,

    /// The delivery leg of the checkout chain failed for this order.
    DeliveryFailed,
}

impl InternalStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            InternalStatus::Normal => "Normal",
            InternalStatus::DeliveryFailed => "DeliveryFailed",
        }
    }
}

impl std::fmt::Display for InternalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InternalStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Normal" => Ok(InternalStatus::Normal),
            "DeliveryFailed" => Ok(InternalStatus::DeliveryFailed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
