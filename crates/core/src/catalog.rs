//! Catalog models
//!
//! Read-only, server-sourced product data: products with their spec sheets
//! and attached discount, metered addons, and OS templates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::money::Amount;

/// A sellable VPS product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned product id.
    pub id: i64,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price per month, in whole VND.
    pub monthly_price: Amount,
    /// Price per year; already discounted for the annual commitment.
    pub yearly_price: Amount,
    /// Display attributes from the product spec sheet (vCPU, RAM, disk, ...).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// The single discount attached to this product, if any.
    #[serde(default)]
    pub discount: Option<Discount>,
    /// Whether an OS template must be selected before provisioning.
    #[serde(default = "default_true")]
    pub requires_os_template: bool,
}

fn default_true() -> bool {
    true
}

/// A discount code attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    /// The code a customer submits to claim the discount.
    pub code: String,
    /// Percentage off the pre-VAT base subtotal, e.g. `10.0` for 10% off.
    pub discount_percent: f64,
}

impl Discount {
    /// Whether a submitted code claims this discount.
    ///
    /// Codes are matched case-insensitively with surrounding whitespace
    /// ignored.
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        self.code.trim().eq_ignore_ascii_case(code.trim())
    }
}

/// The kind of metered resource an addon provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddonKind {
    /// Additional vCPU cores.
    Cpu,
    /// Additional memory.
    Ram,
    /// Additional disk space.
    Disk,
    /// Additional IPv4 addresses.
    Ip,
    /// A hosting control panel licence.
    ControlPanel,
}

impl AddonKind {
    /// The wire form of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Ram => "RAM",
            Self::Disk => "DISK",
            Self::Ip => "IP",
            Self::ControlPanel => "CONTROL_PANEL",
        }
    }
}

/// An optional metered resource priced per unit per month, added on top of a
/// base product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Addon {
    /// Server-assigned addon id.
    pub id: i64,
    pub addon_type: AddonKind,
    pub name: String,
    /// Unit label, e.g. `"GB"` or `"core"`.
    pub unit: String,
    /// Price per unit per month, in whole VND.
    pub unit_price: Amount,
    /// Largest quantity a single configuration may request.
    pub max_quantity: u32,
}

/// An operating-system template selectable at provisioning time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsTemplate {
    /// Server-assigned template id.
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}
