//! Cart Records
//!
//! The JSON shape of a persisted cart slot.

use rusty_money::Money;
use serde::{Deserialize, Serialize};

use crate::{
    cart::CartItem,
    payments::{PaymentType, SubscriptionPeriod},
    persistence::PersistenceError,
    services::{PriceType, Service, ServiceId, currency_from_code},
};

/// Cart Item Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemRecord {
    pub service: ServiceRecord,
    pub payment_type: PaymentTypeRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_period: Option<SubscriptionPeriod>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Service Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServiceRecord {
    pub id: ServiceId,
    #[serde(default)]
    pub title: String,
    /// Price in minor units
    pub price: i64,
    pub currency: String,
    #[serde(default)]
    pub vendor_name: String,
    #[serde(default)]
    pub price_type: PriceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
}

/// Payment Type Record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum PaymentTypeRecord {
    OneTime,
    Subscription,
}

fn default_quantity() -> u32 {
    1
}

impl From<&CartItem> for CartItemRecord {
    fn from(item: &CartItem) -> Self {
        let service = item.service();

        let (payment_type, subscription_period) = match item.payment() {
            PaymentType::OneTime => (PaymentTypeRecord::OneTime, None),
            PaymentType::Subscription(period) => (PaymentTypeRecord::Subscription, Some(period)),
        };

        Self {
            service: ServiceRecord {
                id: service.id.clone(),
                title: service.title.clone(),
                price: service.price.to_minor_units(),
                currency: service.price.currency().iso_alpha_code.to_string(),
                vendor_name: service.vendor_name.clone(),
                price_type: service.price_type,
                delivery_time: service.delivery_time.clone(),
            },
            payment_type,
            subscription_period,
            quantity: item.quantity(),
        }
    }
}

impl TryFrom<CartItemRecord> for CartItem {
    type Error = PersistenceError;

    fn try_from(record: CartItemRecord) -> Result<Self, Self::Error> {
        let ServiceRecord {
            id,
            title,
            price,
            currency,
            vendor_name,
            price_type,
            delivery_time,
        } = record.service;

        let currency =
            currency_from_code(&currency).ok_or(PersistenceError::UnknownCurrency(currency))?;

        // A subscription stored without a period reads as monthly.
        let payment = match record.payment_type {
            PaymentTypeRecord::OneTime => PaymentType::OneTime,
            PaymentTypeRecord::Subscription => {
                PaymentType::Subscription(record.subscription_period.unwrap_or_default())
            }
        };

        let service = Service {
            id,
            title,
            price: Money::from_minor(price, currency),
            vendor_name,
            price_type,
            delivery_time,
        };

        Ok(CartItem::with_quantity(service, payment, record.quantity))
    }
}
