//! Bazaar cart CLI
//!
//! Drives a file-backed cart against a YAML service catalog.

use std::{
    io::{self, Write},
    process,
};

use bazaar::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::config::{AddArgs, Command, Config};

mod config;
mod logging;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("unknown service: {0}")]
    UnknownService(String),
}

/// Bazaar cart CLI entry point
pub fn main() {
    let config = Config::load().unwrap_or_else(|e| e.exit());

    if let Err(e) = logging::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {e}");
        }
    }

    if let Err(e) = run(config) {
        #[expect(clippy::print_stderr, reason = "CLI error output")]
        {
            eprintln!("Error: {e}");
        }

        #[expect(clippy::exit, reason = "CLI exit status")]
        process::exit(1);
    }
}

fn run(config: Config) -> Result<(), CliError> {
    let catalog = Catalog::from_path(&config.catalog)?;

    let persistence =
        KeyValueCartPersistence::with_key(FileStore::new(&config.data_dir), config.cart_key);
    let mut cart = CartStore::open(persistence, catalog.currency());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    execute(config.command, &catalog, &mut cart, &mut out)
}

fn execute<P: CartPersistence>(
    command: Command,
    catalog: &Catalog,
    cart: &mut CartStore<P>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Services => list_services(catalog, out)?,
        Command::Add(args) => add(catalog, cart, args, out)?,
        Command::Remove { service_id } => {
            cart.remove_from_cart(&service_id)?;
            write_status(cart, out)?;
        }
        Command::Update {
            service_id,
            quantity,
        } => {
            cart.update_quantity(&service_id, quantity)?;
            write_status(cart, out)?;
        }
        Command::Clear => {
            cart.clear_cart()?;
            info!("cart cleared");
            write_status(cart, out)?;
        }
        Command::Show => cart.summary()?.write_to(out)?,
    }

    Ok(())
}

fn list_services(catalog: &Catalog, out: &mut impl Write) -> Result<(), CliError> {
    for service in catalog.iter() {
        writeln!(
            out,
            "{:<18} {:<30} {:>12} {:<8} {}",
            service.id,
            service.title,
            service.price.to_string(),
            service.price_type.to_string(),
            service.vendor_name,
        )?;
    }

    Ok(())
}

fn add<P: CartPersistence>(
    catalog: &Catalog,
    cart: &mut CartStore<P>,
    args: AddArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let service = catalog
        .get(&args.service_id)
        .cloned()
        .ok_or(CliError::UnknownService(args.service_id))?;

    let payment = PaymentType::from(args.subscription);

    info!(service_id = %service.id, %payment, "adding service");

    cart.add_to_cart(service, payment)?;

    write_status(cart, out)
}

fn write_status<P: CartPersistence>(
    cart: &CartStore<P>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    writeln!(
        out,
        "{} item(s), total {}",
        cart.item_count(),
        cart.total()?
    )?;

    Ok(())
}
