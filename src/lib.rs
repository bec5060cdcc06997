//! Bazaar
//!
//! Cart store for a marketing services marketplace. Clients collect services from vendors
//! into a session cart, paying once or by subscription, and the cart derives its totals
//! with a discount for yearly subscriptions. The cart is persisted to a key-value slot after
//! every change.

pub mod cart;
pub mod catalog;
pub mod payments;
pub mod persistence;
pub mod prelude;
pub mod pricing;
pub mod services;
pub mod storage;
pub mod summary;
