//! Delivery status state machine.

use serde::{Deserialize, Serialize};

use crate::error::UnknownStatus;

/// Status of a delivery.
///
/// Allowed transitions:
/// ```text
/// Pending ──► InProgress ──► Delivered
///    │            │
///    └────────────┴──► Canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeliveryStatus {
    /// Created, not yet picked up by the courier.
    #[default]
    Pending,

    /// Courier is on the way.
    InProgress,

    /// Dropped off; the delivered-at timestamp is set (terminal).
    Delivered,

    /// Canceled before drop-off (terminal).
    Canceled,
}

impl DeliveryStatus {
    /// Returns true if the transition from `self` to `target` is allowed.
    pub fn can_transition_to(&self, target: DeliveryStatus) -> bool {
        use DeliveryStatus::*;
        matches!(
            (self, target),
            (Pending, InProgress)
                | (InProgress, Delivered)
                | (Pending, Canceled)
                | (InProgress, Canceled)
        )
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Canceled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "Pending",
            DeliveryStatus::InProgress => "InProgress",
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::Canceled => "Canceled",
        }
    }

    /// All statuses, for exhaustive transition checks in tests.
    pub const ALL: [DeliveryStatus; 4] = [
        DeliveryStatus::Pending,
        DeliveryStatus::InProgress,
        DeliveryStatus::Delivered,
        DeliveryStatus::Canceled,
    ];
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeliveryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOWED: [(DeliveryStatus, DeliveryStatus); 4] = [
        (DeliveryStatus::Pending, DeliveryStatus::InProgress),
        (DeliveryStatus::InProgress, DeliveryStatus::Delivered),
        (DeliveryStatus::Pending, DeliveryStatus::Canceled),
        (DeliveryStatus::InProgress, DeliveryStatus::Canceled),
    ];

    #[test]
    fn allowed_transitions() {
        for (from, to) in ALLOWED {
            assert!(from.can_transition_to(to), "{from} -> {to} should be allowed");
        }
    }

    #[test]
    fn every_other_pair_is_refused() {
        for from in DeliveryStatus::ALL {
            for to in DeliveryStatus::ALL {
                let allowed = ALLOWED.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    allowed,
                    "{from} -> {to} mismatch"
                );
            }
        }
    }

    #[test]
    fn terminal_states() {
        assert!(DeliveryStatus::Delivered.is_terminal());
        assert!(DeliveryStatus::Canceled.is_terminal());
        assert!(!DeliveryStatus::Pending.is_terminal());
        assert!(!DeliveryStatus::InProgress.is_terminal());
    }

    #[test]
    fn parse_roundtrip() {
        for status in DeliveryStatus::ALL {
            assert_eq!(status.as_str().parse::<DeliveryStatus>().unwrap(), status);
        }
        assert!("Bogus".parse::<DeliveryStatus>().is_err());
    }
}
