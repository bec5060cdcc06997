//! Cart
//!
//! The session cart: an ordered list of services, at most one line per service, persisted
//! after every change.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    payments::PaymentType,
    persistence::{CartPersistence, PersistenceError},
    pricing::{self, PricingError},
    services::{Service, ServiceId},
    summary::CartSummary,
};

pub mod items;

pub use items::CartItem;

/// Errors raised by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was updated in memory but could not be persisted.
    #[error("failed to persist cart: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Cart store for a single session.
///
/// Items keep their insertion order. Re-adding a service updates its line in place.
#[derive(Debug)]
pub struct CartStore<P: CartPersistence> {
    items: Vec<CartItem>,
    positions: FxHashMap<ServiceId, usize>,
    currency: &'static Currency,
    persistence: P,
}

impl<P: CartPersistence> CartStore<P> {
    /// Open the cart, loading any persisted items.
    ///
    /// Never fails: unreadable storage yields an empty cart. Persisted lines priced in a
    /// currency other than `currency` are dropped. Persisted lines that share a service id
    /// are merged into the first, summing their quantities.
    pub fn open(persistence: P, currency: &'static Currency) -> Self {
        let mut store = Self {
            items: Vec::new(),
            positions: FxHashMap::default(),
            currency,
            persistence,
        };

        for item in store.persistence.load() {
            let item_currency = item.service().price.currency();

            if item_currency != currency {
                warn!(
                    service_id = %item.service_id(),
                    expected = currency.iso_alpha_code,
                    found = item_currency.iso_alpha_code,
                    "dropping persisted cart item priced in another currency"
                );

                continue;
            }

            match store.positions.get(item.service_id()) {
                Some(&idx) => {
                    if let Some(existing) = store.items.get_mut(idx) {
                        existing.increment(item.quantity());
                    }
                }
                None => store.push(item),
            }
        }

        debug!(items = store.items.len(), "opened cart");

        store
    }

    /// Add a service to the cart.
    ///
    /// If the service is already present its payment type is replaced and its quantity
    /// goes up by one. Otherwise a new line with a quantity of one is appended.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the updated cart cannot be persisted.
    pub fn add_to_cart(&mut self, service: Service, payment: PaymentType) -> Result<(), CartError> {
        if service.id.is_empty() {
            warn!(title = %service.title, "adding service with an empty id");
        }

        match self.positions.get(&service.id) {
            Some(&idx) => {
                if let Some(item) = self.items.get_mut(idx) {
                    item.set_payment(payment);
                    item.increment(1);
                }
            }
            None => self.push(CartItem::new(service, payment)),
        }

        self.persist()
    }

    /// Remove a service from the cart. Removing an absent service does nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be persisted.
    pub fn remove_from_cart(&mut self, service_id: &str) -> Result<(), CartError> {
        match self.positions.remove(service_id) {
            Some(idx) => {
                self.items.remove(idx);
                self.reindex_from(idx);
            }
            None => debug!(service_id, "remove ignored, service not in cart"),
        }

        self.persist()
    }

    /// Set the quantity of a service in the cart.
    ///
    /// A quantity of zero or less removes the service. Quantities above `u32::MAX` are
    /// capped. Updating an absent service does nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be persisted.
    pub fn update_quantity(&mut self, service_id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_from_cart(service_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or_else(|_| {
            debug!(service_id, quantity, "quantity capped at u32::MAX");

            u32::MAX
        });

        match self
            .positions
            .get(service_id)
            .and_then(|&idx| self.items.get_mut(idx))
        {
            Some(item) => item.set_quantity(quantity),
            None => debug!(service_id, "update ignored, service not in cart"),
        }

        self.persist()
    }

    /// Remove every item from the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.items.clear();
        self.positions.clear();

        self.persist()
    }

    /// Total price of the cart, after the yearly subscription discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on overflow or if an item is priced in another currency.
    pub fn total(&self) -> Result<Money<'static, Currency>, PricingError> {
        pricing::total(&self.items, self.currency)
    }

    /// Per-line breakdown of the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on overflow or if an item is priced in another currency.
    pub fn summary(&self) -> Result<CartSummary, PricingError> {
        CartSummary::from_items(&self.items, self.currency)
    }

    /// Sum of the quantities of every item.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Get the item for a service.
    #[must_use]
    pub fn get_item(&self, service_id: &str) -> Option<&CartItem> {
        self.positions
            .get(service_id)
            .and_then(|&idx| self.items.get(idx))
    }

    /// Iterate over the items in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency the cart is totalled in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The injected persistence.
    #[must_use]
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Consume the cart and return its persistence.
    pub fn into_persistence(self) -> P {
        self.persistence
    }

    fn push(&mut self, item: CartItem) {
        self.positions
            .insert(item.service_id().clone(), self.items.len());
        self.items.push(item);
    }

    fn reindex_from(&mut self, start: usize) {
        for (idx, item) in self.items.iter().enumerate().skip(start) {
            self.positions.insert(item.service_id().clone(), idx);
        }
    }

    fn persist(&mut self) -> Result<(), CartError> {
        self.persistence.save(&self.items)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::{
        payments::SubscriptionPeriod,
        persistence::KeyValueCartPersistence,
        storage::{KeyValueStore, MemoryStore, StorageError},
    };

    use super::*;

    type MemoryCart = CartStore<KeyValueCartPersistence<MemoryStore>>;

    fn empty_cart() -> MemoryCart {
        CartStore::open(KeyValueCartPersistence::new(MemoryStore::new()), USD)
    }

    fn service(id: &str, major: i64) -> Service {
        Service::new(id, format!("Service {id}"), Money::from_minor(major * 100, USD))
    }

    const YEARLY: PaymentType = PaymentType::Subscription(SubscriptionPeriod::Yearly);

    #[test]
    fn one_time_item_totals_its_price() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 100), PaymentType::OneTime)?;

        assert_eq!(cart.total()?, Money::from_minor(10_000, USD));
        assert_eq!(cart.item_count(), 1);

        Ok(())
    }

    #[test]
    fn yearly_item_totals_discounted_year() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 100), YEARLY)?;

        assert_eq!(cart.total()?, Money::from_minor(96_000, USD));

        Ok(())
    }

    #[test]
    fn adding_twice_increments_single_row() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 100), PaymentType::OneTime)?;
        cart.add_to_cart(service("s1", 100), PaymentType::OneTime)?;
        cart.add_to_cart(service("s1", 100), PaymentType::OneTime)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get_item("s1").map(CartItem::quantity), Some(3));
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn re_adding_overwrites_payment_type_and_keeps_quantity() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 100), PaymentType::OneTime)?;
        cart.update_quantity("s1", 4)?;
        cart.add_to_cart(service("s1", 100), YEARLY)?;

        let item = cart.get_item("s1").ok_or("expected s1 in cart")?;

        assert_eq!(item.payment(), YEARLY);
        assert_eq!(item.quantity(), 5);

        Ok(())
    }

    #[test]
    fn re_adding_keeps_position() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("a", 1), PaymentType::OneTime)?;
        cart.add_to_cart(service("b", 2), PaymentType::OneTime)?;
        cart.add_to_cart(service("a", 1), PaymentType::OneTime)?;

        let ids: Vec<&str> = cart.iter().map(|item| item.service_id().as_str()).collect();

        assert_eq!(ids, vec!["a", "b"]);

        Ok(())
    }

    #[test]
    fn update_to_zero_or_negative_removes() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 100), PaymentType::OneTime)?;
        cart.add_to_cart(service("s2", 50), PaymentType::OneTime)?;
        cart.update_quantity("s1", 3)?;

        cart.update_quantity("s1", 0)?;
        cart.update_quantity("s2", -5)?;

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);

        Ok(())
    }

    #[test]
    fn update_caps_quantity_at_u32_max() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 1), PaymentType::OneTime)?;
        cart.update_quantity("s1", 10_000)?;

        assert_eq!(cart.item_count(), 10_000);

        cart.update_quantity("s1", i64::MAX)?;

        assert_eq!(cart.item_count(), u64::from(u32::MAX));

        Ok(())
    }

    #[test]
    fn update_absent_service_is_noop() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 1), PaymentType::OneTime)?;
        cart.update_quantity("missing", 7)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 1);

        Ok(())
    }

    #[test]
    fn remove_absent_service_is_noop() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 1), PaymentType::OneTime)?;
        let before = cart.items().to_vec();

        cart.remove_from_cart("missing")?;

        assert_eq!(cart.items(), before.as_slice());

        Ok(())
    }

    #[test]
    fn remove_keeps_lookups_consistent() -> TestResult {
        let mut cart = empty_cart();

        for id in ["a", "b", "c", "d"] {
            cart.add_to_cart(service(id, 1), PaymentType::OneTime)?;
        }

        cart.remove_from_cart("b")?;
        cart.update_quantity("d", 9)?;
        cart.add_to_cart(service("c", 1), PaymentType::OneTime)?;

        assert_eq!(cart.get_item("a").map(CartItem::quantity), Some(1));
        assert_eq!(cart.get_item("b"), None);
        assert_eq!(cart.get_item("c").map(CartItem::quantity), Some(2));
        assert_eq!(cart.get_item("d").map(CartItem::quantity), Some(9));
        assert_eq!(cart.len(), 3);

        Ok(())
    }

    #[test]
    fn clear_empties_and_persists() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 1), PaymentType::OneTime)?;
        cart.clear_cart()?;

        assert!(cart.is_empty());
        assert_eq!(cart.total()?, Money::from_minor(0, USD));
        assert!(cart.persistence().load().is_empty());

        Ok(())
    }

    #[test]
    fn every_mutation_is_persisted() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 1), PaymentType::OneTime)?;
        assert_eq!(cart.persistence().load(), cart.items());

        cart.update_quantity("s1", 4)?;
        assert_eq!(cart.persistence().load(), cart.items());

        cart.add_to_cart(service("s2", 2), YEARLY)?;
        assert_eq!(cart.persistence().load(), cart.items());

        cart.remove_from_cart("s1")?;
        assert_eq!(cart.persistence().load(), cart.items());

        Ok(())
    }

    #[test]
    fn reopening_restores_items() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("s1", 100), YEARLY)?;
        cart.add_to_cart(service("s2", 20), PaymentType::OneTime)?;
        cart.update_quantity("s2", 3)?;

        let items = cart.items().to_vec();
        let reopened = CartStore::open(cart.into_persistence(), USD);

        assert_eq!(reopened.items(), items.as_slice());
        assert_eq!(reopened.total()?, Money::from_minor(96_000 + 6_000, USD));

        Ok(())
    }

    #[test]
    fn opening_merges_duplicate_persisted_lines() -> TestResult {
        let duplicated = vec![
            CartItem::with_quantity(service("s1", 1), PaymentType::OneTime, 2),
            CartItem::new(service("s2", 1), PaymentType::OneTime),
            CartItem::with_quantity(service("s1", 1), YEARLY, 3),
        ];

        let mut persistence = KeyValueCartPersistence::new(MemoryStore::new());
        persistence.save(&duplicated)?;

        let cart = CartStore::open(persistence, USD);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get_item("s1").map(CartItem::quantity), Some(5));
        assert_eq!(
            cart.get_item("s1").map(CartItem::payment),
            Some(PaymentType::OneTime)
        );

        Ok(())
    }

    #[test]
    fn empty_id_is_accepted() -> TestResult {
        let mut cart = empty_cart();

        cart.add_to_cart(service("", 5), PaymentType::OneTime)?;

        assert_eq!(cart.len(), 1);
        assert!(cart.get_item("").is_some());

        Ok(())
    }

    #[test]
    fn foreign_currency_item_fails_total() -> TestResult {
        let mut cart = CartStore::open(KeyValueCartPersistence::new(MemoryStore::new()), GBP);

        cart.add_to_cart(service("s1", 1), PaymentType::OneTime)?;

        assert!(matches!(cart.total(), Err(PricingError::Money(_))));

        Ok(())
    }

    #[test]
    fn opening_drops_items_in_another_currency() -> TestResult {
        let stored = vec![
            CartItem::new(
                Service::new("gbp", "Priced in GBP", Money::from_minor(5_000, GBP)),
                PaymentType::OneTime,
            ),
            CartItem::with_quantity(service("usd", 10), PaymentType::OneTime, 2),
        ];

        let mut persistence = KeyValueCartPersistence::new(MemoryStore::new());
        persistence.save(&stored)?;

        let mut cart = CartStore::open(persistence, USD);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get_item("gbp"), None);
        assert_eq!(cart.total()?, Money::from_minor(2_000, USD));

        cart.add_to_cart(service("s1", 1), PaymentType::OneTime)?;

        assert_eq!(cart.total()?, Money::from_minor(2_100, USD));
        assert!(cart.summary().is_ok());

        Ok(())
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    #[test]
    fn failed_save_keeps_in_memory_change() {
        let mut cart = CartStore::open(KeyValueCartPersistence::new(ReadOnlyStore), USD);

        let result = cart.add_to_cart(service("s1", 1), PaymentType::OneTime);

        assert!(matches!(result, Err(CartError::Persistence(_))));
        assert_eq!(cart.len(), 1);
    }
}
