//! Local add-to-cart pricing
//!
//! When no authenticated session exists the storefront prices configurations
//! locally: a base unit price chosen by billing cycle, at most one product
//! discount, a single VAT rounding step, and independently priced addon
//! lines that are never discounted.
//!
//! Discount amounts stay exact decimals until the one-shot rounding that
//! produces the displayed subtotal and VAT; the displayed line total is
//! always `subtotal + vat`.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    billing::BillingCycle,
    cart::{AddonLine, AddonLines, CartItem, DiscountApplied, Quantity},
    catalog::{Addon, Product},
    money::{Amount, MoneyError, round_half_up, vat_on},
};

/// Errors raised while pricing a configuration.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// An addon was requested beyond its maximum quantity. Caught before
    /// submission; blocks the quote without contacting the server.
    #[error("addon {addon} allows at most {max} units, {requested} requested")]
    AddonQuantityExceeded {
        /// Addon display name.
        addon: String,
        requested: u32,
        max: u32,
    },

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Price arithmetic overflowed.
    #[error("price computation overflowed")]
    Overflow,

    /// Wrapped money rounding error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A requested addon with its quantity.
///
/// A quantity of zero means "not selected" and contributes nothing.
#[derive(Debug, Clone, Copy)]
pub struct AddonSelection<'a> {
    pub addon: &'a Addon,
    pub quantity: u32,
}

/// Everything needed to price one configuration.
#[derive(Debug, Clone, Copy)]
pub struct QuoteRequest<'a> {
    pub product: &'a Product,
    pub cycle: BillingCycle,
    pub quantity: Quantity,
    pub addons: &'a [AddonSelection<'a>],
    /// A discount code submitted by the customer, if any. Only a code
    /// matching the product's attached discount applies.
    pub discount_code: Option<&'a str>,
}

/// A priced configuration.
#[derive(Debug, Clone)]
pub struct Quote {
    /// Base price per month after cycle selection, rounded for display.
    pub unit_price: Amount,
    /// Base subtotal before any discount, exact.
    pub subtotal_before_discount: Decimal,
    /// Discount taken off the base subtotal, exact (not independently
    /// rounded).
    pub discount_amount: Decimal,
    /// Base subtotal after discount, exact.
    pub after_discount: Decimal,
    /// Displayed pre-VAT base subtotal (addons excluded).
    pub subtotal: Amount,
    /// VAT on the discounted base, rounded once.
    pub vat: Amount,
    /// Displayed base total; always `subtotal + vat`.
    pub total: Amount,
    /// Priced addon lines, in selection order.
    pub addon_lines: AddonLines,
    /// Sum of addon line totals. Addons are never discounted and carry no
    /// VAT of their own.
    pub config_cost: Amount,
    /// `total + config_cost`.
    pub grand_total: Amount,
    /// The discount record to attach to the cart item, if one applied.
    pub discount_applied: Option<DiscountApplied>,
}

impl Quote {
    /// Build the local cart item for this quote.
    ///
    /// The item id is synthesized from the product, cycle and creation time.
    /// Addon cost folds into the pre-VAT subtotal so the line upholds
    /// `total == subtotal + vat` with `total == grand_total`.
    #[must_use]
    pub fn into_cart_item(
        self,
        product: &Product,
        cycle: BillingCycle,
        quantity: Quantity,
        created_at: Timestamp,
    ) -> CartItem {
        let subtotal = self.subtotal + self.config_cost;

        CartItem {
            id: CartItem::local_id(product.id, cycle, created_at),
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            billing_cycle: cycle,
            unit_price: self.unit_price,
            total_price: self.grand_total,
            subtotal,
            vat: self.vat,
            total: self.grand_total,
            addons_applied: self.addon_lines,
            discount_applied: self.discount_applied,
        }
    }
}

/// Price a configuration.
///
/// - Base unit price is `monthly_price`, or `yearly_price / 12` for annual
///   commitments.
/// - `subtotal_before_discount = base * months * quantity`.
/// - A submitted code discounts the base subtotal only when it matches the
///   product's attached discount.
/// - VAT is 10% of the discounted base, rounded once.
/// - Addon lines are priced `unit_price * quantity * months`, never
///   discounted, and summed separately into `config_cost`.
///
/// # Errors
///
/// - [`QuoteError::AddonQuantityExceeded`]: an addon exceeds its maximum.
/// - [`QuoteError::PercentConversion`]: the discount percentage could not be
///   applied safely.
/// - [`QuoteError::Overflow`] / [`QuoteError::Money`]: price arithmetic
///   overflowed.
pub fn quote(request: &QuoteRequest<'_>) -> Result<Quote, QuoteError> {
    let base = base_unit_price(request.product, request.cycle);
    let months = Decimal::from(request.cycle.months());
    let quantity = Decimal::from(request.quantity.get());

    let subtotal_before_discount = base
        .checked_mul(months)
        .and_then(|value| value.checked_mul(quantity))
        .ok_or(QuoteError::Overflow)?;

    let matched = request.discount_code.and_then(|code| {
        request
            .product
            .discount
            .as_ref()
            .filter(|discount| discount.matches(code))
    });

    let discount_amount = match matched {
        Some(discount) => percent_of(discount.discount_percent, subtotal_before_discount)?,
        None => Decimal::ZERO,
    };

    let after_discount = subtotal_before_discount
        .checked_sub(discount_amount)
        .ok_or(QuoteError::Overflow)?;

    let subtotal = round_half_up(after_discount)?;
    let vat = vat_on(after_discount)?;
    let total = subtotal + vat;

    let mut addon_lines = SmallVec::new();
    let mut config_cost: Amount = 0;

    for selection in request.addons {
        if selection.quantity == 0 {
            continue;
        }

        if selection.quantity > selection.addon.max_quantity {
            return Err(QuoteError::AddonQuantityExceeded {
                addon: selection.addon.name.clone(),
                requested: selection.quantity,
                max: selection.addon.max_quantity,
            });
        }

        let line_total = addon_line_total(selection.addon, selection.quantity, request.cycle)?;

        config_cost = config_cost
            .checked_add(line_total)
            .ok_or(QuoteError::Overflow)?;

        addon_lines.push(AddonLine {
            addon_type: selection.addon.addon_type.as_str().to_string(),
            quantity: selection.quantity,
            unit: selection.addon.unit.clone(),
            total_price: line_total,
        });
    }

    let grand_total = total.checked_add(config_cost).ok_or(QuoteError::Overflow)?;

    let discount_applied = match matched {
        Some(discount) => Some(DiscountApplied {
            code: discount.code.clone(),
            discount_percent: discount.discount_percent,
            discount_amount: round_half_up(discount_amount)?,
        }),
        None => None,
    };

    Ok(Quote {
        unit_price: round_half_up(base)?,
        subtotal_before_discount,
        discount_amount,
        after_discount,
        subtotal,
        vat,
        total,
        addon_lines,
        config_cost,
        grand_total,
        discount_applied,
    })
}

/// Base price per month for a product under the given cycle, exact.
fn base_unit_price(product: &Product, cycle: BillingCycle) -> Decimal {
    if cycle.is_annual_commitment() {
        Decimal::from(product.yearly_price) / Decimal::from(12)
    } else {
        Decimal::from(product.monthly_price)
    }
}

/// An addon line total: `unit_price * quantity * months`.
fn addon_line_total(
    addon: &Addon,
    quantity: u32,
    cycle: BillingCycle,
) -> Result<Amount, QuoteError> {
    addon
        .unit_price
        .checked_mul(Amount::from(quantity))
        .and_then(|value| value.checked_mul(Amount::from(cycle.months())))
        .ok_or(QuoteError::Overflow)
}

/// `percent`% of `value`, exact.
fn percent_of(percent: f64, value: Decimal) -> Result<Decimal, QuoteError> {
    let fraction = percent / 100.0;

    if !fraction.is_finite() {
        return Err(QuoteError::PercentConversion);
    }

    (Percentage::from(fraction) * Decimal::ONE)
        .checked_mul(value)
        .ok_or(QuoteError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::{AddonKind, Discount};

    use super::*;

    fn product(monthly: Amount, yearly: Amount) -> Product {
        Product {
            id: 7,
            name: "VPS Basic".to_string(),
            description: None,
            monthly_price: monthly,
            yearly_price: yearly,
            attributes: std::collections::BTreeMap::new(),
            discount: None,
            requires_os_template: true,
        }
    }

    fn ram_addon() -> Addon {
        Addon {
            id: 1,
            addon_type: AddonKind::Ram,
            name: "Extra RAM".to_string(),
            unit: "GB".to_string(),
            unit_price: 50_000,
            max_quantity: 16,
        }
    }

    #[test]
    fn annual_cycle_uses_yearly_rate() -> TestResult {
        let product = product(120_000, 1_200_000);

        let quoted = quote(&QuoteRequest {
            product: &product,
            cycle: BillingCycle::ANNUAL,
            quantity: Quantity::ONE,
            addons: &[],
            discount_code: None,
        })?;

        assert_eq!(quoted.unit_price, 100_000);
        assert_eq!(quoted.subtotal, 1_200_000);
        assert_eq!(quoted.vat, 120_000);
        assert_eq!(quoted.total, 1_320_000);
        assert_eq!(quoted.grand_total, 1_320_000);

        Ok(())
    }

    #[test]
    fn monthly_cycle_uses_monthly_rate() -> TestResult {
        let product = product(120_000, 1_200_000);

        let quoted = quote(&QuoteRequest {
            product: &product,
            cycle: BillingCycle::SEMI_ANNUAL,
            quantity: Quantity::ONE,
            addons: &[],
            discount_code: None,
        })?;

        assert_eq!(quoted.subtotal, 720_000);
        assert_eq!(quoted.vat, 72_000);
        assert_eq!(quoted.total, 792_000);

        Ok(())
    }

    #[test]
    fn matching_code_discounts_the_base() -> TestResult {
        let mut product = product(100_000, 1_000_000);
        product.discount = Some(Discount {
            code: "SUMMER10".to_string(),
            discount_percent: 10.0,
        });

        let quoted = quote(&QuoteRequest {
            product: &product,
            cycle: BillingCycle::MONTHLY,
            quantity: Quantity::ONE,
            addons: &[],
            discount_code: Some("SUMMER10"),
        })?;

        assert_eq!(quoted.subtotal_before_discount, Decimal::from(100_000));
        assert_eq!(quoted.discount_amount, Decimal::from(10_000));
        assert_eq!(quoted.after_discount, Decimal::from(90_000));
        assert_eq!(quoted.vat, 9_000);
        assert_eq!(quoted.total, 99_000);

        Ok(())
    }

    #[test]
    fn non_matching_code_is_ignored() -> TestResult {
        let mut product = product(100_000, 1_000_000);
        product.discount = Some(Discount {
            code: "SUMMER10".to_string(),
            discount_percent: 10.0,
        });

        let quoted = quote(&QuoteRequest {
            product: &product,
            cycle: BillingCycle::MONTHLY,
            quantity: Quantity::ONE,
            addons: &[],
            discount_code: Some("WINTER20"),
        })?;

        assert_eq!(quoted.discount_amount, Decimal::ZERO);
        assert_eq!(quoted.total, 110_000);
        assert!(quoted.discount_applied.is_none());

        Ok(())
    }

    #[test]
    fn addon_lines_are_never_discounted() -> TestResult {
        let mut product = product(100_000, 1_000_000);
        product.discount = Some(Discount {
            code: "SUMMER10".to_string(),
            discount_percent: 10.0,
        });

        let addon = ram_addon();

        let quoted = quote(&QuoteRequest {
            product: &product,
            cycle: BillingCycle::SEMI_ANNUAL,
            quantity: Quantity::ONE,
            addons: &[AddonSelection {
                addon: &addon,
                quantity: 2,
            }],
            discount_code: Some("SUMMER10"),
        })?;

        // 50,000 * 2 units * 6 months, untouched by the 10% code.
        assert_eq!(quoted.config_cost, 600_000);
        assert_eq!(
            quoted.addon_lines.first().map(|line| line.total_price),
            Some(600_000)
        );
        assert_eq!(quoted.grand_total, quoted.total + 600_000);

        Ok(())
    }

    #[test]
    fn zero_quantity_addon_is_skipped() -> TestResult {
        let product = product(100_000, 1_000_000);
        let addon = ram_addon();

        let quoted = quote(&QuoteRequest {
            product: &product,
            cycle: BillingCycle::MONTHLY,
            quantity: Quantity::ONE,
            addons: &[AddonSelection {
                addon: &addon,
                quantity: 0,
            }],
            discount_code: None,
        })?;

        assert_eq!(quoted.config_cost, 0);
        assert!(quoted.addon_lines.is_empty());

        Ok(())
    }

    #[test]
    fn addon_over_max_blocks_the_quote() {
        let product = product(100_000, 1_000_000);
        let addon = ram_addon();

        let result = quote(&QuoteRequest {
            product: &product,
            cycle: BillingCycle::MONTHLY,
            quantity: Quantity::ONE,
            addons: &[AddonSelection {
                addon: &addon,
                quantity: 17,
            }],
            discount_code: None,
        });

        assert!(matches!(
            result,
            Err(QuoteError::AddonQuantityExceeded {
                requested: 17,
                max: 16,
                ..
            })
        ));
    }

    #[test]
    fn quantity_scales_the_base_subtotal() -> TestResult {
        let product = product(100_000, 1_000_000);

        let quoted = quote(&QuoteRequest {
            product: &product,
            cycle: BillingCycle::MONTHLY,
            quantity: Quantity::new(3)?,
            addons: &[],
            discount_code: None,
        })?;

        assert_eq!(quoted.subtotal, 300_000);
        assert_eq!(quoted.total, 330_000);

        Ok(())
    }

    #[test]
    fn cart_item_upholds_the_total_invariant() -> TestResult {
        let mut product = product(100_000, 1_000_000);
        product.discount = Some(Discount {
            code: "SUMMER10".to_string(),
            discount_percent: 10.0,
        });

        let addon = ram_addon();

        let quoted = quote(&QuoteRequest {
            product: &product,
            cycle: BillingCycle::MONTHLY,
            quantity: Quantity::ONE,
            addons: &[AddonSelection {
                addon: &addon,
                quantity: 1,
            }],
            discount_code: Some("SUMMER10"),
        })?;

        let grand_total = quoted.grand_total;
        let item = quoted.into_cart_item(
            &product,
            BillingCycle::MONTHLY,
            Quantity::ONE,
            Timestamp::UNIX_EPOCH,
        );

        assert_eq!(item.total, item.subtotal + item.vat);
        assert_eq!(item.total, grand_total);
        assert_eq!(item.id, "local-7-1m-0");
        assert_eq!(item.addons_applied.len(), 1);

        Ok(())
    }
}
