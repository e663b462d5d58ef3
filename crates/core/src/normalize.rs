//! Normalization of server cart payloads
//!
//! The cart endpoints store billing cycles as strings and price lines
//! VAT-inclusive. This module is the single conversion point from those raw
//! shapes onto display-ready [`CartItem`]s. Normalization is additive:
//! nothing from the input is discarded, and missing optional fields default
//! to zero, `None` or an empty sequence.

use serde::Deserialize;
use thiserror::Error;

use crate::{
    billing::BillingCycle,
    cart::{AddonLine, Cart, CartError, CartItem, DiscountApplied, Quantity},
    money::{Amount, MoneyError, embedded_vat},
};

/// Errors raised while normalizing a server cart payload.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The server item carried no usable identifier.
    #[error("cart item for product {0} has no identifier")]
    MissingItemId(i64),

    /// Wrapped quantity or item lookup error.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A raw cart line item as returned by the cart endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCartItem {
    #[serde(default)]
    pub id: Option<i64>,
    /// Some responses name the identifier `cart_item_id`; it wins over `id`.
    #[serde(default)]
    pub cart_item_id: Option<i64>,
    pub product_id: i64,
    #[serde(default)]
    pub product_name: String,
    /// Month count, as a string on the wire.
    #[serde(default)]
    pub billing_cycle: Option<String>,
    /// Defaults to one when absent.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Base price per month, in whole VND.
    pub unit_price: Amount,
    /// Gross line total with VAT embedded, in whole VND.
    pub total_price: Amount,
    #[serde(default)]
    pub config: RawItemConfig,
}

fn default_quantity() -> u32 {
    1
}

/// The `config` object nested in a raw line item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItemConfig {
    #[serde(default)]
    pub addons_applied: Vec<AddonLine>,
    #[serde(default)]
    pub discount_applied: Option<RawDiscountApplied>,
}

/// The raw discount record nested in an item config.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDiscountApplied {
    pub code: String,
    #[serde(default)]
    pub discount_percent: f64,
    /// Absent amounts default to zero.
    #[serde(default)]
    pub discount_amount: Amount,
}

/// A raw cart payload with its server metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCart {
    #[serde(default)]
    pub cart_id: Option<i64>,
    #[serde(default)]
    pub total_amount: Option<Amount>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub items: Vec<RawCartItem>,
}

/// Normalize a single raw line item into its display-ready shape.
///
/// The VAT embedded in `total_price` is recovered as
/// `round(total_price * 10 / 110)` and the pre-VAT subtotal as the
/// remainder, so `total == subtotal + vat` holds exactly.
///
/// # Errors
///
/// - [`NormalizeError::MissingItemId`]: neither `cart_item_id` nor `id` was
///   present.
/// - [`NormalizeError::Cart`]: the server reported a zero quantity.
/// - [`NormalizeError::Money`]: VAT extraction overflowed.
pub fn normalize_item(raw: RawCartItem) -> Result<CartItem, NormalizeError> {
    let id = raw
        .cart_item_id
        .or(raw.id)
        .map(|id| id.to_string())
        .ok_or(NormalizeError::MissingItemId(raw.product_id))?;

    let quantity = Quantity::new(raw.quantity)?;
    let vat = embedded_vat(raw.total_price)?;

    let discount_applied = raw.config.discount_applied.map(|discount| DiscountApplied {
        code: discount.code,
        discount_percent: discount.discount_percent,
        discount_amount: discount.discount_amount,
    });

    Ok(CartItem {
        id,
        product_id: raw.product_id,
        product_name: raw.product_name,
        quantity,
        billing_cycle: BillingCycle::from_wire(raw.billing_cycle.as_deref()),
        unit_price: raw.unit_price,
        total_price: raw.total_price,
        subtotal: raw.total_price - vat,
        vat,
        total: raw.total_price,
        addons_applied: raw.config.addons_applied.into(),
        discount_applied,
    })
}

/// Normalize a raw cart payload, preserving its server metadata.
///
/// # Errors
///
/// Propagates the first [`normalize_item`] failure.
pub fn normalize_cart(raw: RawCart) -> Result<Cart, NormalizeError> {
    let items = raw
        .items
        .into_iter()
        .map(normalize_item)
        .collect::<Result<Vec<_>, _>>()?;

    let mut cart = Cart::from_items(items);
    cart.cart_id = raw.cart_id;
    cart.total_amount = raw.total_amount;
    cart.currency = raw.currency;

    Ok(cart)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn raw_item(value: serde_json::Value) -> RawCartItem {
        serde_json::from_value(value).expect("raw item should deserialize")
    }

    #[test]
    fn vat_is_recovered_from_gross_total() -> TestResult {
        let item = normalize_item(raw_item(json!({
            "cart_item_id": 31,
            "product_id": 7,
            "product_name": "VPS Basic",
            "billing_cycle": "12",
            "quantity": 1,
            "unit_price": 100_000,
            "total_price": 1_320_000,
        })))?;

        assert_eq!(item.vat, 120_000);
        assert_eq!(item.subtotal, 1_200_000);
        assert_eq!(item.total, item.subtotal + item.vat);
        assert_eq!(item.billing_cycle.months(), 12);

        Ok(())
    }

    #[test]
    fn invariant_holds_for_totals_that_round() -> TestResult {
        // 99,999 * 10 / 110 = 9,090.8... -> 9,091; subtotal takes the rest.
        let item = normalize_item(raw_item(json!({
            "id": 1,
            "product_id": 1,
            "unit_price": 99_999,
            "total_price": 99_999,
        })))?;

        assert_eq!(item.vat, 9_091);
        assert_eq!(item.subtotal, 90_908);
        assert_eq!(item.total, item.subtotal + item.vat);

        Ok(())
    }

    #[test]
    fn missing_optionals_default() -> TestResult {
        let item = normalize_item(raw_item(json!({
            "id": 5,
            "product_id": 2,
            "unit_price": 110,
            "total_price": 110,
        })))?;

        assert_eq!(item.quantity.get(), 1);
        assert_eq!(item.billing_cycle.months(), 1);
        assert!(item.addons_applied.is_empty());
        assert!(item.discount_applied.is_none());

        Ok(())
    }

    #[test]
    fn unparseable_cycle_falls_back_to_one_month() -> TestResult {
        let item = normalize_item(raw_item(json!({
            "id": 5,
            "product_id": 2,
            "billing_cycle": "every-year",
            "unit_price": 110,
            "total_price": 110,
        })))?;

        assert_eq!(item.billing_cycle.months(), 1);

        Ok(())
    }

    #[test]
    fn cart_item_id_wins_over_id() -> TestResult {
        let item = normalize_item(raw_item(json!({
            "id": 1,
            "cart_item_id": 2,
            "product_id": 2,
            "unit_price": 110,
            "total_price": 110,
        })))?;

        assert_eq!(item.id, "2");

        Ok(())
    }

    #[test]
    fn missing_id_is_an_error() {
        let result = normalize_item(raw_item(json!({
            "product_id": 9,
            "unit_price": 110,
            "total_price": 110,
        })));

        assert!(matches!(result, Err(NormalizeError::MissingItemId(9))));
    }

    #[test]
    fn zero_quantity_is_an_error() {
        let result = normalize_item(raw_item(json!({
            "id": 1,
            "product_id": 9,
            "quantity": 0,
            "unit_price": 110,
            "total_price": 110,
        })));

        assert!(matches!(
            result,
            Err(NormalizeError::Cart(CartError::ZeroQuantity))
        ));
    }

    #[test]
    fn discount_and_addons_pass_through() -> TestResult {
        let item = normalize_item(raw_item(json!({
            "id": 3,
            "product_id": 4,
            "unit_price": 100_000,
            "total_price": 99_000,
            "config": {
                "addons_applied": [
                    { "addon_type": "RAM", "quantity": 2, "unit": "GB", "total_price": 60_000 },
                    { "addon_type": "IP", "quantity": 1, "unit": "address", "total_price": 30_000 },
                ],
                "discount_applied": {
                    "code": "SUMMER10",
                    "discount_percent": 10.0,
                },
            },
        })))?;

        assert_eq!(item.addons_applied.len(), 2);
        assert_eq!(
            item.addons_applied.first().map(|line| line.addon_type.as_str()),
            Some("RAM")
        );

        let discount = item.discount_applied.expect("discount should survive");

        assert_eq!(discount.code, "SUMMER10");
        // Absent amounts default to zero.
        assert_eq!(discount.discount_amount, 0);

        Ok(())
    }

    #[test]
    fn normalize_cart_keeps_metadata_and_order() -> TestResult {
        let raw: RawCart = serde_json::from_value(json!({
            "cart_id": 12,
            "total_amount": 220,
            "currency": "VND",
            "items": [
                { "id": 1, "product_id": 1, "unit_price": 110, "total_price": 110 },
                { "id": 2, "product_id": 2, "unit_price": 110, "total_price": 110 },
            ],
        }))?;

        let cart = normalize_cart(raw)?;

        assert_eq!(cart.cart_id, Some(12));
        assert_eq!(cart.total_amount, Some(220));
        assert_eq!(cart.currency.as_deref(), Some("VND"));
        assert_eq!(cart.item_count(), 2);

        let ids: Vec<&str> = cart.iter().map(|item| item.id.as_str()).collect();

        assert_eq!(ids, vec!["1", "2"]);

        Ok(())
    }
}
