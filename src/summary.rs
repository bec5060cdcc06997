//! Cart Summary
//!
//! A priced breakdown of a cart, as read by checkout and printed by the CLI.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::CartItem,
    payments::PaymentType,
    pricing::{self, PricingError},
    services::ServiceId,
};

/// Errors that can occur when writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Error pricing the summary.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error writing the summary.
    #[error("failed to write summary: {0}")]
    Io(#[from] io::Error),
}

/// One priced cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    /// Service identifier
    pub service_id: ServiceId,

    /// Service title
    pub title: String,

    /// Vendor name
    pub vendor_name: String,

    /// Payment classification
    pub payment: PaymentType,

    /// Quantity
    pub quantity: u32,

    /// Price of one unit after discount
    pub unit_price: Money<'static, Currency>,

    /// Price of the line before discount
    pub list_price: Money<'static, Currency>,

    /// Price of the line after discount
    pub line_total: Money<'static, Currency>,
}

impl SummaryLine {
    fn from_item(item: &CartItem) -> Result<Self, PricingError> {
        let service = item.service();

        Ok(Self {
            service_id: service.id.clone(),
            title: service.title.clone(),
            vendor_name: service.vendor_name.clone(),
            payment: item.payment(),
            quantity: item.quantity(),
            unit_price: pricing::unit_price(item)?,
            list_price: pricing::list_price(item)?,
            line_total: pricing::line_total(item)?,
        })
    }

    /// Discount applied to the line.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.list_price.sub(self.line_total)
    }
}

/// Priced breakdown of a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
    lines: Vec<SummaryLine>,
    subtotal: Money<'static, Currency>,
    total: Money<'static, Currency>,
    currency: &'static Currency,
}

impl CartSummary {
    /// Price every item in `items`.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on overflow or if an item is priced in another currency.
    pub fn from_items(
        items: &[CartItem],
        currency: &'static Currency,
    ) -> Result<Self, PricingError> {
        let lines = items
            .iter()
            .map(SummaryLine::from_item)
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal = lines
            .iter()
            .try_fold(Money::from_minor(0, currency), |acc, line| {
                acc.add(line.list_price)
            })?;

        let total = pricing::total(items, currency)?;

        Ok(Self {
            lines,
            subtotal,
            total,
            currency,
        })
    }

    /// Priced lines in cart order.
    #[must_use]
    pub fn lines(&self) -> &[SummaryLine] {
        &self.lines
    }

    /// Total before discounts.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Total after discounts.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Sum of the quantities of every line.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Amount saved by discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Savings as a fraction of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(Decimal::ZERO));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ONE);

        Ok(Percentage::from(savings_dec / subtotal_dec))
    }

    /// Writes the summary as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        if self.lines.is_empty() {
            writeln!(out, "Cart is empty.")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record([
            "", "Service", "Vendor", "Billing", "Qty", "Unit", "List", "Total",
        ]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                format!("{}\n{}", line.title, line.service_id),
                line.vendor_name.clone(),
                line.payment.to_string(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.list_price.to_string(),
                line.line_total.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(4..8), Alignment::right());

        writeln!(out, "{table}")?;

        let savings_points = percent_points(self.savings_percent()?);

        writeln!(out, " Items:    {}", self.item_count())?;
        writeln!(out, " Subtotal: {}", self.subtotal)?;
        writeln!(out, " Savings:  ({savings_points:.2}%) {}", self.savings()?)?;
        writeln!(out, " Total:    {}", self.total)?;

        Ok(())
    }
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
