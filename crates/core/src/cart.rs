//! Cart
//!
//! Display-ready cart line items and the cart aggregate. Every priced line
//! upholds `total == subtotal + vat` exactly, in whole VND, and quantities
//! are at least one by construction.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    billing::BillingCycle,
    money::{Amount, MoneyError, round_half_up},
};

/// Errors related to cart construction or mutation.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities below one are rejected at the mutation boundary.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// An item was not found in the cart.
    #[error("cart item {0} not found")]
    ItemNotFound(String),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A line-item quantity; at least one by construction.
///
/// Holding the `quantity >= 1` invariant in the type closes the
/// divide-by-previous-quantity hazard in [`CartItem::rescale_quantity`]: the
/// stored quantity can never be zero, so the derivation cannot divide by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for zero.
    pub fn new(value: u32) -> Result<Self, CartError> {
        if value == 0 {
            Err(CartError::ZeroQuantity)
        } else {
            Ok(Self(value))
        }
    }

    /// The numeric value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;

        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// A priced addon line attached to a cart item.
///
/// Addon lines are passed through from the server configuration unchanged;
/// the `addon_type` stays in its wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonLine {
    pub addon_type: String,
    pub quantity: u32,
    /// Unit label, e.g. `"GB"`.
    pub unit: String,
    /// Line total across the whole billing cycle, in whole VND.
    pub total_price: Amount,
}

/// The discount recorded against a cart item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountApplied {
    pub code: String,
    #[serde(default)]
    pub discount_percent: f64,
    /// Absent amounts default to zero.
    #[serde(default)]
    pub discount_amount: Amount,
}

/// Addon lines for a single item; small carts keep them inline.
pub type AddonLines = SmallVec<[AddonLine; 4]>;

/// A display-ready cart line item.
///
/// Invariant: `total == subtotal + vat` exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Server item id, or a synthesized id for locally added items.
    pub id: String,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: Quantity,
    pub billing_cycle: BillingCycle,
    /// Base price per month, before discounts and VAT.
    pub unit_price: Amount,
    /// Gross line total as priced, VAT embedded.
    pub total_price: Amount,
    /// Pre-VAT portion of the line.
    pub subtotal: Amount,
    /// VAT portion of the line.
    pub vat: Amount,
    /// Displayed line total; always `subtotal + vat`.
    pub total: Amount,
    #[serde(default)]
    pub addons_applied: AddonLines,
    #[serde(default)]
    pub discount_applied: Option<DiscountApplied>,
}

impl CartItem {
    /// Synthesize the identifier for a locally added item from the product,
    /// billing cycle and creation time.
    #[must_use]
    pub fn local_id(product_id: i64, cycle: BillingCycle, created_at: Timestamp) -> String {
        format!(
            "local-{product_id}-{}m-{}",
            cycle.months(),
            created_at.as_millisecond()
        )
    }

    /// Rescale the line to a new quantity without re-running pricing rules.
    ///
    /// Derives per-unit subtotal and VAT by dividing the current aggregates
    /// by the current quantity, then multiplies by the new one. This
    /// preserves any applied discount ratio without needing the discount rule
    /// again. The displayed total is recomputed as `subtotal + vat`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Money`] if the scaled amounts overflow.
    pub fn rescale_quantity(&mut self, quantity: Quantity) -> Result<(), CartError> {
        let old = Decimal::from(self.quantity.get());
        let new = Decimal::from(quantity.get());

        self.subtotal = round_half_up(Decimal::from(self.subtotal) / old * new)?;
        self.vat = round_half_up(Decimal::from(self.vat) / old * new)?;
        self.total = self.subtotal + self.vat;
        self.total_price = self.total;
        self.quantity = quantity;

        Ok(())
    }
}

/// An ordered collection of cart line items plus optional server metadata.
///
/// A cart is created implicitly on the first add and lives for the session:
/// server-backed when authenticated, local-store-backed otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    /// Server-side cart id; absent for purely local carts.
    #[serde(default)]
    pub cart_id: Option<i64>,
    /// Server-reported grand total, when synced.
    #[serde(default)]
    pub total_amount: Option<Amount>,
    /// ISO currency code reported by the server.
    #[serde(default)]
    pub currency: Option<String>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart holding the given items and no server metadata.
    pub fn from_items(items: impl Into<Vec<CartItem>>) -> Self {
        Self {
            items: items.into(),
            ..Self::default()
        }
    }

    /// The items in the cart, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over the items in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// The number of line items, *not* the sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of displayed line totals.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.items.iter().map(|item| item.total).sum()
    }

    /// Sum of pre-VAT line subtotals.
    #[must_use]
    pub fn subtotal(&self) -> Amount {
        self.items.iter().map(|item| item.subtotal).sum()
    }

    /// Sum of line VAT portions.
    #[must_use]
    pub fn vat(&self) -> Amount {
        self.items.iter().map(|item| item.vat).sum()
    }

    /// Whether at least one line holds the given product, independent of
    /// billing cycle or addons.
    #[must_use]
    pub fn contains_product(&self, product_id: i64) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    /// Get an item by id.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] when no line has the id.
    pub fn get_item(&self, id: &str) -> Result<&CartItem, CartError> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))
    }

    /// Get an item by id, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] when no line has the id.
    pub fn get_item_mut(&mut self, id: &str) -> Result<&mut CartItem, CartError> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))
    }

    /// Append a line item.
    pub fn push_item(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Remove an item by id and return it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] when no line has the id.
    pub fn remove_item(&mut self, id: &str) -> Result<CartItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))?;

        Ok(self.items.remove(index))
    }

    /// Remove every item and forget any server metadata.
    pub fn clear(&mut self) {
        self.items.clear();
        self.cart_id = None;
        self.total_amount = None;
        self.currency = None;
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn item(id: &str, product_id: i64, quantity: u32, subtotal: Amount, vat: Amount) -> CartItem {
        CartItem {
            id: id.to_string(),
            product_id,
            product_name: format!("Product {product_id}"),
            quantity: Quantity::new(quantity).expect("test quantity"),
            billing_cycle: BillingCycle::MONTHLY,
            unit_price: subtotal,
            total_price: subtotal + vat,
            subtotal,
            vat,
            total: subtotal + vat,
            addons_applied: smallvec![],
            discount_applied: None,
        }
    }

    #[test]
    fn quantity_rejects_zero() {
        assert!(matches!(Quantity::new(0), Err(CartError::ZeroQuantity)));
    }

    #[test]
    fn quantity_deserialize_rejects_zero() {
        let result: Result<Quantity, _> = serde_json::from_str("0");

        assert!(result.is_err());
    }

    #[test]
    fn rescale_scales_per_unit_amounts_exactly() -> TestResult {
        // quantity 2, total 200,000 -> quantity 3, total 300,000
        let mut line = item("a", 1, 2, 181_818, 18_182);

        assert_eq!(line.total, 200_000);

        line.rescale_quantity(Quantity::new(3)?)?;

        assert_eq!(line.total, 300_000);
        assert_eq!(line.quantity.get(), 3);
        assert_eq!(line.total, line.subtotal + line.vat);

        Ok(())
    }

    #[test]
    fn rescale_preserves_discount_ratio_without_reapplying() -> TestResult {
        let mut line = item("a", 1, 1, 90_000, 9_000);
        line.discount_applied = Some(DiscountApplied {
            code: "SUMMER10".to_string(),
            discount_percent: 10.0,
            discount_amount: 10_000,
        });

        line.rescale_quantity(Quantity::new(4)?)?;

        assert_eq!(line.subtotal, 360_000);
        assert_eq!(line.vat, 36_000);
        assert_eq!(line.total, 396_000);
        // The recorded discount is untouched; only aggregates scale.
        assert_eq!(
            line.discount_applied
                .as_ref()
                .map(|discount| discount.discount_amount),
            Some(10_000)
        );

        Ok(())
    }

    #[test]
    fn item_count_counts_lines_not_quantities() -> TestResult {
        let cart = Cart::from_items([item("a", 1, 3, 100, 10), item("b", 2, 5, 200, 20)]);

        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn contains_product_ignores_cycle_and_addons() -> TestResult {
        let mut annual = item("a", 7, 1, 100, 10);
        annual.billing_cycle = BillingCycle::ANNUAL;
        annual.addons_applied = smallvec![AddonLine {
            addon_type: "RAM".to_string(),
            quantity: 2,
            unit: "GB".to_string(),
            total_price: 50_000,
        }];

        let cart = Cart::from_items([annual]);

        assert!(cart.contains_product(7));
        assert!(!cart.contains_product(8));

        Ok(())
    }

    #[test]
    fn aggregate_totals_sum_lines() {
        let cart = Cart::from_items([item("a", 1, 1, 100, 10), item("b", 2, 1, 200, 20)]);

        assert_eq!(cart.subtotal(), 300);
        assert_eq!(cart.vat(), 30);
        assert_eq!(cart.total(), 330);
        assert_eq!(cart.total(), cart.subtotal() + cart.vat());
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let cart = Cart::new();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0);
        assert_eq!(cart.subtotal(), 0);
        assert_eq!(cart.vat(), 0);
    }

    #[test]
    fn remove_item_returns_the_line() -> TestResult {
        let mut cart = Cart::from_items([item("a", 1, 1, 100, 10)]);

        let removed = cart.remove_item("a")?;

        assert_eq!(removed.id, "a");
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn remove_missing_item_errors() {
        let mut cart = Cart::new();

        let result = cart.remove_item("nope");

        assert!(matches!(result, Err(CartError::ItemNotFound(_))));
    }

    #[test]
    fn clear_drops_items_and_metadata() {
        let mut cart = Cart::from_items([item("a", 1, 1, 100, 10)]);
        cart.cart_id = Some(44);
        cart.currency = Some("VND".to_string());

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.cart_id.is_none());
        assert!(cart.currency.is_none());
    }

    #[test]
    fn local_id_embeds_product_cycle_and_time() {
        let at = Timestamp::UNIX_EPOCH;

        let id = CartItem::local_id(7, BillingCycle::ANNUAL, at);

        assert_eq!(id, "local-7-12m-0");
    }
}
