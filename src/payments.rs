//! Payments

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Billing cadence of a subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPeriod {
    /// Billed every month at the listed price.
    #[default]
    Monthly,

    /// Billed once a year for twelve months, at a discount.
    Yearly,
}

impl fmt::Display for SubscriptionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubscriptionPeriod::Monthly => "monthly",
            SubscriptionPeriod::Yearly => "yearly",
        })
    }
}

/// How a cart line will be paid for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaymentType {
    /// Paid once.
    #[default]
    OneTime,

    /// Paid on a recurring basis.
    Subscription(SubscriptionPeriod),
}

impl PaymentType {
    /// Returns the subscription period, if this is a subscription.
    #[must_use]
    pub fn subscription_period(&self) -> Option<SubscriptionPeriod> {
        match self {
            PaymentType::OneTime => None,
            PaymentType::Subscription(period) => Some(*period),
        }
    }

    /// Check if this payment is billed yearly.
    #[must_use]
    pub fn is_yearly(&self) -> bool {
        matches!(self, PaymentType::Subscription(SubscriptionPeriod::Yearly))
    }
}

impl From<Option<SubscriptionPeriod>> for PaymentType {
    fn from(period: Option<SubscriptionPeriod>) -> Self {
        period.map_or(PaymentType::OneTime, PaymentType::Subscription)
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentType::OneTime => f.write_str("one-time"),
            PaymentType::Subscription(period) => write!(f, "{period} subscription"),
        }
    }
}
