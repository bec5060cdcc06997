//! Cart Items

use crate::{
    payments::PaymentType,
    services::{Service, ServiceId},
};

/// A service in the cart, with how it will be paid for and how many.
#[derive(Clone, Debug, PartialEq)]
pub struct CartItem {
    service: Service,
    payment: PaymentType,
    quantity: u32,
}

impl CartItem {
    /// Creates a new item with a quantity of one.
    #[must_use]
    pub fn new(service: Service, payment: PaymentType) -> Self {
        Self::with_quantity(service, payment, 1)
    }

    /// Creates a new item with the given quantity. A zero quantity is raised to one.
    #[must_use]
    pub fn with_quantity(service: Service, payment: PaymentType, quantity: u32) -> Self {
        Self {
            service,
            payment,
            quantity: quantity.max(1),
        }
    }

    /// Returns the service this item refers to
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the service identifier
    pub fn service_id(&self) -> &ServiceId {
        &self.service.id
    }

    /// Returns the payment classification
    pub fn payment(&self) -> PaymentType {
        self.payment
    }

    /// Returns the quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn set_payment(&mut self, payment: PaymentType) {
        self.payment = payment;
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    pub(crate) fn increment(&mut self, by: u32) {
        self.quantity = self.quantity.saturating_add(by);
    }
}
