//! Pricing
//!
//! Derives line and cart totals from cart items. All arithmetic is done in minor units.
//! The only discount is for yearly subscriptions: twelve months at the listed price, less 20%.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{cart::CartItem, payments::PaymentType};

/// Number of monthly charges billed by a yearly subscription.
pub const MONTHS_PER_YEAR: i64 = 12;

/// Errors that can occur while pricing cart items.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Minor unit arithmetic overflowed.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Discount applied to yearly subscriptions.
pub fn yearly_discount() -> Percentage {
    Percentage::from(Decimal::new(20, 2))
}

/// Price of a single unit of the item, after any discount.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the price cannot be represented in minor units.
pub fn unit_price(item: &CartItem) -> Result<Money<'static, Currency>, PricingError> {
    discounted(&item.service().price, item.payment(), 1)
}

/// Price of the whole line before any discount.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the price cannot be represented in minor units.
pub fn list_price(item: &CartItem) -> Result<Money<'static, Currency>, PricingError> {
    undiscounted(&item.service().price, item.payment(), item.quantity())
}

/// Price of the whole line after any discount.
///
/// Yearly lines are rounded once, after multiplying out the quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the price cannot be represented in minor units.
pub fn line_total(item: &CartItem) -> Result<Money<'static, Currency>, PricingError> {
    discounted(&item.service().price, item.payment(), item.quantity())
}

/// Calculates the total price of a list of items.
///
/// An empty list totals zero in the given currency.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line or the sum could not be represented in minor units.
/// - [`PricingError::Money`]: an item is priced in a currency other than `currency`.
pub fn total(
    items: &[CartItem],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    items
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            let line = line_total(item)?;

            if acc
                .to_minor_units()
                .checked_add(line.to_minor_units())
                .is_none()
            {
                return Err(PricingError::Overflow);
            }

            Ok(acc.add(line)?)
        })
}

fn undiscounted(
    price: &Money<'static, Currency>,
    payment: PaymentType,
    quantity: u32,
) -> Result<Money<'static, Currency>, PricingError> {
    let months = if payment.is_yearly() {
        MONTHS_PER_YEAR
    } else {
        1
    };

    let minor = price
        .to_minor_units()
        .checked_mul(months)
        .and_then(|minor| minor.checked_mul(i64::from(quantity)))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}

fn discounted(
    price: &Money<'static, Currency>,
    payment: PaymentType,
    quantity: u32,
) -> Result<Money<'static, Currency>, PricingError> {
    let list = undiscounted(price, payment, quantity)?;

    if !payment.is_yearly() {
        return Ok(list);
    }

    let discount = percent_of_minor(&yearly_discount(), list.to_minor_units())?;

    Ok(list.sub(Money::from_minor(discount, list.currency()))?)
}

/// Calculate a percentage of a minor unit amount, rounding midpoints away from zero.
fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::Overflow)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}
