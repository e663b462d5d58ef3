//! Order models.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use stratus::money::Amount;

/// The labelled steps the order page walks through, in order.
pub const ORDER_STEPS: [&str; 4] = ["Pending payment", "Paid", "Provisioning", "Active"];

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    Provisioning,
    Active,
    Cancelled,
    /// A status string this client does not know.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Index of the current step in [`ORDER_STEPS`].
    ///
    /// Cancelled and unknown orders sit outside the progression.
    #[must_use]
    pub fn step(self) -> Option<usize> {
        match self {
            Self::PendingPayment => Some(0),
            Self::Paid => Some(1),
            Self::Provisioning => Some(2),
            Self::Active => Some(3),
            Self::Cancelled | Self::Unknown => None,
        }
    }

    /// Whether the order will not progress any further.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Active | Self::Cancelled)
    }
}

/// A line item inside an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub quantity: u32,
    pub total_price: Amount,
}

/// A customer order.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub status: OrderStatus,
    pub total_amount: Amount,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_onto_the_step_progression() {
        assert_eq!(OrderStatus::PendingPayment.step(), Some(0));
        assert_eq!(OrderStatus::Paid.step(), Some(1));
        assert_eq!(OrderStatus::Provisioning.step(), Some(2));
        assert_eq!(OrderStatus::Active.step(), Some(3));
        assert_eq!(OrderStatus::Cancelled.step(), None);
    }

    #[test]
    fn only_active_and_cancelled_are_terminal() {
        assert!(OrderStatus::Active.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::PendingPayment.is_terminal());
        assert!(!OrderStatus::Provisioning.is_terminal());
    }

    #[test]
    fn unknown_wire_statuses_are_tolerated() {
        let status: OrderStatus =
            serde_json::from_value(serde_json::json!("REFUNDED")).expect("should tolerate");

        assert_eq!(status, OrderStatus::Unknown);
        assert_eq!(status.step(), None);
    }
}
