//! Order status transitions.
//!
//! ```text
//! pending ──▶ paid ──▶ fulfilled
//!    │          │
//!    └────┬─────┘
//!         ▼
//!     cancelled
//! ```
//!
//! `fulfilled` and `cancelled` are terminal.

use std::{fmt, str::FromStr};

use crate::entity::sea_orm_active_enums::OrderStatus;
use crate::error::CommerceError;

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Fulfilled | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            (Pending, Paid) | (Paid, Fulfilled) | (Pending, Cancelled) | (Paid, Cancelled)
        )
    }

    /// Returns `target` if the move is legal from `self`.
    pub fn transition(self, target: OrderStatus) -> Result<OrderStatus, CommerceError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(CommerceError::InvalidTransition {
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "fulfilled" => Ok(OrderStatus::Fulfilled),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(CommerceError::Validation(format!(
                "unknown order status: {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn happy_path_is_legal() {
        assert_eq!(
            OrderStatus::Pending.transition(OrderStatus::Paid).unwrap(),
            OrderStatus::Paid
        );
        assert_eq!(
            OrderStatus::Paid.transition(OrderStatus::Fulfilled).unwrap(),
            OrderStatus::Fulfilled
        );
    }

    #[test]
    fn skipping_paid_is_rejected() {
        let err = OrderStatus::Pending
            .transition(OrderStatus::Fulfilled)
            .unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Fulfilled
            }
        ));
    }

    #[test]
    fn cancel_only_from_open_states() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Fulfilled.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for from in OrderStatus::iter().filter(|s| s.is_terminal()) {
            for to in OrderStatus::iter() {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn no_self_transitions() {
        for status in OrderStatus::iter() {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn parses_status_strings() {
        assert_eq!("PAID".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
        assert_eq!(
            " canceled ".parse::<OrderStatus>().unwrap(),
            OrderStatus::Cancelled
        );
        assert!("shipped".parse::<OrderStatus>().is_err());
        for status in OrderStatus::iter() {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }
}
