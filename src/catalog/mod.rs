//! Catalog
//!
//! Read-only collection of the services on offer, loaded from YAML.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::fixtures::CatalogFixture,
    services::{Service, ServiceId},
};

pub mod fixtures;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A service was defined with an empty id
    #[error("Service id must not be empty")]
    EmptyId,

    /// Currency mismatch between services
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The catalog defines no services
    #[error("Catalog defines no services; currency unknown")]
    Empty,
}

/// Catalog of services, all priced in one currency.
#[derive(Debug, Clone)]
pub struct Catalog {
    services: FxHashMap<ServiceId, Service>,
    currency: &'static Currency,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&contents)?;

        debug!(path = %path.display(), services = catalog.len(), "loaded catalog");

        Ok(catalog)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid, a service is malformed, the services are
    /// priced in different currencies, or no services are defined.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let mut services = FxHashMap::default();
        let mut currency: Option<&'static Currency> = None;

        for (id, service_fixture) in fixture.services {
            let service = service_fixture.try_into_service(id)?;
            let service_currency = service.price.currency();

            match currency {
                Some(existing) if existing != service_currency => {
                    return Err(CatalogError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        service_currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => currency = Some(service_currency),
            }

            services.insert(service.id.clone(), service);
        }

        let currency = currency.ok_or(CatalogError::Empty)?;

        Ok(Self { services, currency })
    }

    /// Get a service by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Service> {
        self.services.get(id)
    }

    /// Iterate over the services, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        let mut services: Vec<&Service> = self.services.values().collect();

        services.sort_by(|a, b| a.id.cmp(&b.id));

        services.into_iter()
    }

    /// Number of services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Check if the catalog has no services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Currency every service is priced in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::services::PriceType;

    use super::*;

    const YAML: &str = r"
services:
  seo-audit:
    title: SEO Audit
    price: 150.00 USD
    vendor: Northwind Digital
    delivery: 5 days
  ppc:
    title: PPC Management
    price: 450 USD
    vendor: Brightside Media
    price_type: monthly
";

    #[test]
    fn parses_services() -> TestResult {
        let catalog = Catalog::from_yaml_str(YAML)?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.currency(), USD);

        let audit = catalog.get("seo-audit").ok_or("expected seo-audit")?;

        assert_eq!(audit.title, "SEO Audit");
        assert_eq!(audit.price, Money::from_minor(15_000, USD));
        assert_eq!(audit.vendor_name, "Northwind Digital");
        assert_eq!(audit.price_type, PriceType::Fixed);
        assert_eq!(audit.delivery_time.as_deref(), Some("5 days"));

        let ppc = catalog.get("ppc").ok_or("expected ppc")?;

        assert_eq!(ppc.price_type, PriceType::Monthly);
        assert_eq!(ppc.delivery_time, None);

        Ok(())
    }

    #[test]
    fn iterates_in_id_order() -> TestResult {
        let catalog = Catalog::from_yaml_str(YAML)?;

        let ids: Vec<&str> = catalog.iter().map(|service| service.id.as_str()).collect();

        assert_eq!(ids, vec!["ppc", "seo-audit"]);

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let yaml = r"
services:
  a:
    title: A
    price: 1.00 USD
  b:
    title: B
    price: 1.00 GBP
";

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            Catalog::from_yaml_str("services: {}"),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn unknown_price_type_is_a_yaml_error() {
        let yaml = r"
services:
  a:
    title: A
    price: 1.00 USD
    price_type: barter
";

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::Yaml(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Catalog::from_path("does/not/exist.yml"),
            Err(CatalogError::Io(_))
        ));
    }
}
