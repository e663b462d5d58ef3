//! Billing cycles
//!
//! A billing cycle is the number of months a line item is prepaid for. The
//! storefront sells cycles of 1, 3, 6 and 12 months; annual commitments are
//! priced from the (already discounted) yearly price.

use serde::{Deserialize, Serialize};

/// The number of months a cart or order line item is prepaid for.
///
/// The wire representation is a *string* month count; [`BillingCycle::from_wire`]
/// parses it and falls back to one month when the value is absent or
/// unparseable. Locally the cycle is always held as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillingCycle {
    months: u32,
}

impl BillingCycle {
    /// One month.
    pub const MONTHLY: Self = Self { months: 1 };

    /// Three months.
    pub const QUARTERLY: Self = Self { months: 3 };

    /// Six months.
    pub const SEMI_ANNUAL: Self = Self { months: 6 };

    /// Twelve months.
    pub const ANNUAL: Self = Self { months: 12 };

    /// Create a cycle from a month count; zero falls back to one month.
    #[must_use]
    pub fn new(months: u32) -> Self {
        Self {
            months: months.max(1),
        }
    }

    /// Parse the wire representation, a string month count.
    ///
    /// Absent or unparseable values fall back to one month.
    #[must_use]
    pub fn from_wire(raw: Option<&str>) -> Self {
        let months = raw
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(1);

        Self::new(months)
    }

    /// The number of months in the cycle.
    #[must_use]
    pub fn months(self) -> u32 {
        self.months
    }

    /// Whether this cycle is billed at the annual commitment rate.
    ///
    /// Annual commitments (12, 24 or 36 months) take `yearly_price / 12` as
    /// the base unit price; the yearly price is pre-discounted for the
    /// commitment.
    #[must_use]
    pub fn is_annual_commitment(self) -> bool {
        matches!(self.months, 12 | 24 | 36)
    }
}

impl Default for BillingCycle {
    fn default() -> Self {
        Self::MONTHLY
    }
}
