//! Services
//!
//! Catalog entries offered by vendors. The cart only ever reads these.

use std::{borrow::Borrow, fmt};

use rusty_money::{
    Money,
    iso::{AUD, CAD, Currency, EUR, GBP, USD},
};
use serde::{Deserialize, Serialize};

/// Identifier of a catalog service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Create a new service identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the identifier is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for ServiceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ServiceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// How a vendor advertises the price of a service.
///
/// Descriptive only; pricing never looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    /// A single fixed price for the deliverable.
    #[default]
    Fixed,

    /// Priced per hour of work.
    Hourly,

    /// Priced per month of ongoing work.
    Monthly,
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PriceType::Fixed => "fixed",
            PriceType::Hourly => "hourly",
            PriceType::Monthly => "monthly",
        })
    }
}

/// Look up a supported ISO currency by its alphabetic code.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code {
        "GBP" => Some(GBP),
        "USD" => Some(USD),
        "EUR" => Some(EUR),
        "CAD" => Some(CAD),
        "AUD" => Some(AUD),
        _ => None,
    }
}

/// Service
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    /// Service identifier
    pub id: ServiceId,

    /// Service title
    pub title: String,

    /// Service price
    pub price: Money<'static, Currency>,

    /// Name of the vendor offering the service
    pub vendor_name: String,

    /// Price classification
    pub price_type: PriceType,

    /// Delivery estimate (e.g. "5 days")
    pub delivery_time: Option<String>,
}

impl Service {
    /// Create a fixed price service with no vendor or delivery details.
    pub fn new(
        id: impl Into<ServiceId>,
        title: impl Into<String>,
        price: Money<'static, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            vendor_name: String::new(),
            price_type: PriceType::Fixed,
            delivery_time: None,
        }
    }

    /// Set the vendor name.
    #[must_use]
    pub fn with_vendor(mut self, vendor_name: impl Into<String>) -> Self {
        self.vendor_name = vendor_name.into();
        self
    }

    /// Set the price classification.
    #[must_use]
    pub fn with_price_type(mut self, price_type: PriceType) -> Self {
        self.price_type = price_type;
        self
    }

    /// Set the delivery estimate.
    #[must_use]
    pub fn with_delivery_time(mut self, delivery_time: impl Into<String>) -> Self {
        self.delivery_time = Some(delivery_time.into());
        self
    }
}
