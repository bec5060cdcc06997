//! Integration tests running the bundled service catalog through a cart to checkout.

use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use bazaar::prelude::*;

const CATALOG: &str = "fixtures/services/marketing.yml";

fn memory_cart() -> CartStore<KeyValueCartPersistence<MemoryStore>> {
    CartStore::open(KeyValueCartPersistence::new(MemoryStore::new()), USD)
}

#[test]
fn bundled_catalog_loads() -> TestResult {
    let catalog = Catalog::from_path(CATALOG)?;

    assert_eq!(catalog.currency(), USD);
    assert_eq!(catalog.len(), 6);

    let email = catalog
        .get("email-campaigns")
        .ok_or("expected email-campaigns")?;

    assert_eq!(email.price, Money::from_minor(19_999, USD));
    assert_eq!(email.price_type, PriceType::Monthly);

    Ok(())
}

#[test]
fn checkout_reads_summary_then_clears() -> TestResult {
    let catalog = Catalog::from_path(CATALOG)?;
    let mut cart = memory_cart();

    let audit = catalog.get("seo-audit").ok_or("expected seo-audit")?;
    let email = catalog
        .get("email-campaigns")
        .ok_or("expected email-campaigns")?;

    cart.add_to_cart(audit.clone(), PaymentType::OneTime)?;
    cart.add_to_cart(
        email.clone(),
        PaymentType::Subscription(SubscriptionPeriod::Yearly),
    )?;

    let summary = cart.summary()?;

    // 19999 * 12 = 239988, less 20% (47997.6 -> 47998) = 191990
    assert_eq!(summary.total(), Money::from_minor(15_000 + 191_990, USD));
    assert_eq!(summary.total(), cart.total()?);
    assert_eq!(summary.savings()?, Money::from_minor(47_998, USD));
    assert_eq!(summary.item_count(), cart.item_count());

    cart.clear_cart()?;

    assert!(cart.is_empty());
    assert!(cart.persistence().load().is_empty());

    Ok(())
}

#[test]
fn catalog_services_are_not_mutated_by_the_cart() -> TestResult {
    let catalog = Catalog::from_path(CATALOG)?;
    let mut cart = memory_cart();

    let social = catalog.get("social-media").ok_or("expected social-media")?;

    cart.add_to_cart(social.clone(), PaymentType::OneTime)?;
    cart.update_quantity("social-media", 5)?;

    let line = cart.get_item("social-media").ok_or("expected cart line")?;

    assert_eq!(line.service(), social);
    assert_eq!(
        catalog.get("social-media").map(|service| service.price),
        Some(Money::from_minor(30_000, USD))
    );

    Ok(())
}
