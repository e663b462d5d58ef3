//! Payment models.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use stratus::money::Amount;

/// Gateway status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Expired,
    Cancelled,
    /// A status string this client does not know.
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Whether the gateway will not change this status any further.
    ///
    /// Status polling stops at the first terminal status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Failed | Self::Expired | Self::Cancelled)
    }
}

/// A payment attempt against an order.
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    pub payment_id: i64,
    #[serde(default)]
    pub order_id: Option<i64>,
    pub status: PaymentStatus,
    #[serde(default)]
    pub amount: Option<Amount>,
    /// Bank-transfer QR payload rendered for the customer.
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_the_only_known_non_terminal_status() {
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Paid.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Expired.is_terminal());
        assert!(PaymentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn unknown_wire_statuses_keep_polling() {
        let status: PaymentStatus =
            serde_json::from_value(serde_json::json!("ON_HOLD")).expect("should tolerate");

        assert_eq!(status, PaymentStatus::Unknown);
        assert!(!status.is_terminal());
    }
}
