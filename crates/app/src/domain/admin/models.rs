//! Admin request and response models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stratus::money::Amount;

use crate::domain::orders::models::OrderStatus;

/// Fields for creating a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub monthly_price: Amount,
    pub yearly_price: Amount,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// Partial product update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_price: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_price: Option<Amount>,
}

/// Fields for attaching a discount to a product.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountDraft {
    pub product_id: i64,
    pub code: String,
    pub discount_percent: f64,
}

/// A configured discount as listed by the back office.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminDiscount {
    pub id: i64,
    pub product_id: i64,
    pub code: String,
    pub discount_percent: f64,
}

/// Fields for creating an addon.
#[derive(Debug, Clone, Serialize)]
pub struct AddonDraft {
    pub addon_type: String,
    pub name: String,
    pub unit: String,
    pub unit_price: Amount,
    pub max_quantity: u32,
}

/// An order as seen by the back office.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminOrder {
    pub order_id: i64,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub status: OrderStatus,
    pub total_amount: Amount,
}

/// A homepage banner.
#[derive(Debug, Clone, Deserialize)]
pub struct Banner {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
}

/// Fields for creating a banner.
#[derive(Debug, Clone, Serialize)]
pub struct BannerDraft {
    pub title: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}
