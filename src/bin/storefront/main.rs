//! Storefront CLI
//!
//! Browse the fixture catalog and drive the cart ledger from the command line.

use std::io;

use anyhow::{Result, anyhow};
use storefront::{
    cart::Cart,
    catalog::{Catalog, DEFAULT_RELATED_COUNT, ProductLookup, ProductQuery},
    fixtures::Fixture,
    receipt::{
        Receipt,
        listing::{write_product_detail, write_product_table},
    },
    session::{Credentials, DemoAuthenticator, Session},
};
use tracing::info;

use crate::{
    actions::apply_all,
    config::{CartArgs, Command, Config, LoginArgs, ProductsArgs},
};

mod actions;
mod config;
mod observability;

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|error| error.exit());

    observability::init(&config.logging)?;

    let mut fixture = Fixture::with_base_path(&config.fixtures.fixtures_dir);

    fixture.load_set(&config.fixtures.fixture_set)?;

    match config.command {
        Command::Products(args) => list_products(fixture.catalog()?, &args),
        Command::Product { id } => {
            let catalog = fixture.catalog()?;
            let product = catalog
                .product_by_id(id)
                .ok_or_else(|| anyhow!("product {id} not found"))?;

            let related = catalog.related(product, DEFAULT_RELATED_COUNT);

            write_product_detail(io::stdout().lock(), product, &related)?;

            Ok(())
        }
        Command::Categories => {
            list_categories(fixture.catalog()?);

            Ok(())
        }
        Command::Featured => {
            write_product_table(io::stdout().lock(), &fixture.catalog()?.featured())?;

            Ok(())
        }
        Command::Cart(args) => run_cart(&fixture, &args),
        Command::Login(args) => run_login(&fixture, &args),
    }
}

fn list_products(catalog: &Catalog, args: &ProductsArgs) -> Result<()> {
    let defaults = ProductQuery::default();
    let mut query = ProductQuery::default().sorted_by(args.sort);

    if let Some(category) = &args.category {
        query = query.with_category(category.as_str());
    }

    if let Some(search) = &args.search {
        query = query.with_search(search);
    }

    if args.min_price.is_some() || args.max_price.is_some() {
        query = query.with_price_range(
            args.min_price.unwrap_or(defaults.min_price()),
            args.max_price.unwrap_or(defaults.max_price()),
        );
    }

    write_product_table(io::stdout().lock(), &catalog.query(&query))?;

    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output")]
fn list_categories(catalog: &Catalog) {
    for category in catalog.categories() {
        println!("{category}");
    }
}

fn starting_cart(fixture: &Fixture, args: &CartArgs) -> Result<Cart> {
    if args.seeded {
        Ok(fixture.cart()?)
    } else {
        Ok(fixture.empty_cart())
    }
}

fn run_cart(fixture: &Fixture, args: &CartArgs) -> Result<()> {
    let catalog = fixture.catalog()?;
    let mut cart = starting_cart(fixture, args)?;

    apply_all(&args.actions, &mut cart, catalog);

    Receipt::from_cart(&cart, catalog)?.write_to(io::stdout().lock())?;

    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output")]
fn run_login(fixture: &Fixture, args: &LoginArgs) -> Result<()> {
    let catalog = fixture.catalog()?;
    let mut session = Session::new(starting_cart(fixture, &args.cart)?);

    let user = session.login(
        &DemoAuthenticator::default(),
        &Credentials::new(args.email.as_str(), args.password.as_str()),
    )?;

    println!("Welcome back, {}!", user.name);

    apply_all(&args.cart.actions, session.cart_mut(), catalog);

    Receipt::from_cart(session.cart(), catalog)?.write_to(io::stdout().lock())?;

    session.logout();

    info!(items = session.cart().item_count(), "session ended");

    Ok(())
}
