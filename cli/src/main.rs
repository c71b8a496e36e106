//! Biblio - console front end for the library catalog, membership, and
//! lending engine.
//!
//! The engine and its collaborators are composed here and handed to the
//! menu loop; state is restored from the snapshot file at startup and saved
//! back on demand or at exit.

mod config;
mod error;
mod input;
mod menu;
mod persist;
mod tables;
mod validate;

use crate::config::Config;
use crate::menu::Menu;
use biblio_engine::{CatalogService, LendingEngine, LoanStore, MembershipService};
use chrono::{NaiveDate, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "biblio_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!(data_file = %config.data_file.display(), "starting Biblio");

    // Compose the engine from its collaborators
    let mut engine = LendingEngine::new(
        CatalogService::new(),
        MembershipService::new(),
        LoanStore::new(),
    );

    // Restore the previous state, or offer a fresh start
    if config.data_file.exists() {
        match persist::load(&mut engine, &config.data_file) {
            Ok(metadata) => println!(
                "Loaded {} books, {} members, {} transactions.",
                metadata.book_count, metadata.member_count, metadata.transaction_count
            ),
            Err(err) => {
                tracing::warn!(%err, "could not load saved state");
                println!("Could not load saved state ({err}); starting empty.");
            }
        }
    } else {
        println!("No saved state found; starting a new library.");
        if config.offer_sample_data && input::confirm("Seed sample data? (y/n): ")? {
            seed_sample_data(&mut engine, Utc::now().date_naive());
            println!("Sample data created.");
        }
    }

    println!();
    println!("{}", "=".repeat(44));
    println!("     Biblio library management");
    println!("{}", "=".repeat(44));

    Menu::new(engine, config).run()?;

    Ok(())
}

/// Seed a handful of books and members into an empty library.
fn seed_sample_data(engine: &mut LendingEngine, today: NaiveDate) {
    let books = [
        ("978-0441172719", "Dune", "Frank Herbert", 1965),
        ("978-0547928227", "The Hobbit", "J.R.R. Tolkien", 1937),
        ("978-0061120084", "To Kill a Mockingbird", "Harper Lee", 1960),
        ("978-0141439518", "Pride and Prejudice", "Jane Austen", 1813),
        ("978-0062315007", "The Alchemist", "Paulo Coelho", 1988),
    ];
    for (isbn, title, author, year) in books {
        if let Err(err) = engine.catalog_mut().add_book(isbn, title, author, year, today) {
            tracing::warn!(%err, isbn, "skipping sample book");
        }
    }

    let members = [
        ("Alice Nguyen", "alice@example.com", "0123456789"),
        ("Bob Tran", "bob@example.com", "0987654321"),
        ("Carol Pham", "carol@example.com", "0777777777"),
    ];
    for (name, email, phone) in members {
        if let Err(err) = engine
            .membership_mut()
            .register_member(name, email, phone, today)
        {
            tracing::warn!(%err, email, "skipping sample member");
        }
    }
}
