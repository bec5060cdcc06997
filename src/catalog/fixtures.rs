//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    catalog::CatalogError,
    services::{PriceType, Service, ServiceId, currency_from_code},
};

/// Wrapper for services in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of service id -> service fixture
    pub services: FxHashMap<String, ServiceFixture>,
}

/// Service Fixture
#[derive(Debug, Deserialize)]
pub struct ServiceFixture {
    /// Service title
    pub title: String,

    /// Service price (e.g., "150.00 USD")
    pub price: String,

    /// Vendor name
    #[serde(default)]
    pub vendor: String,

    /// Price classification
    #[serde(default)]
    pub price_type: PriceType,

    /// Delivery estimate
    #[serde(default)]
    pub delivery: Option<String>,
}

impl ServiceFixture {
    /// Convert to a [`Service`] with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or the price cannot be parsed.
    pub fn try_into_service(self, id: String) -> Result<Service, CatalogError> {
        if id.trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }

        let (minor_units, currency) = parse_price(&self.price)?;

        Ok(Service {
            id: ServiceId::new(id),
            title: self.title,
            price: Money::from_minor(minor_units, currency),
            vendor_name: self.vendor,
            price_type: self.price_type,
            delivery_time: self.delivery,
        })
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), CatalogError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(CatalogError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    let currency = currency_from_code(currency_code)
        .ok_or_else(|| CatalogError::UnknownCurrency((*currency_code).to_string()))?;

    Ok((minor_units, currency))
}
