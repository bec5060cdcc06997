//! Bazaar prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartItem, CartStore},
    catalog::{Catalog, CatalogError},
    payments::{PaymentType, SubscriptionPeriod},
    persistence::{
        CART_STORAGE_KEY, CartPersistence, KeyValueCartPersistence, PersistenceError,
    },
    pricing::PricingError,
    services::{PriceType, Service, ServiceId},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
    summary::{CartSummary, SummaryError, SummaryLine},
};
