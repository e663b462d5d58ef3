//! Carts service request and response models.

use serde::{Deserialize, Serialize};
use stratus::{billing::BillingCycle, cart::Quantity};

/// A requested addon line, keyed by the addon's wire type.
#[derive(Debug, Clone, Serialize)]
pub struct AddonRequest {
    pub addon_type: String,
    pub quantity: u32,
}

/// Everything needed to add one configured product to the cart.
#[derive(Debug, Clone)]
pub struct AddItemRequest {
    pub product_id: i64,
    pub billing_cycle: BillingCycle,
    pub quantity: Quantity,
    pub addons: Vec<AddonRequest>,
    pub discount_code: Option<String>,
}

/// The order created by a successful checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: i64,
}
