//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `resolve_db_url` - Pick the store connection string from --db or SEMANA_DB
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_reset` - Clear all stored data

use anyhow::{bail, Context, Result};
use semana_core::db::{Database, DB_URL_ENV};
use semana_core::BudgetStore;

/// Resolve the connection string: --db wins over SEMANA_DB
pub fn resolve_db_url(cli_db: Option<&str>) -> Result<String> {
    resolve_db_url_from(cli_db, std::env::var(DB_URL_ENV).ok())
}

pub(crate) fn resolve_db_url_from(cli_db: Option<&str>, env_db: Option<String>) -> Result<String> {
    let url = cli_db
        .map(str::to_string)
        .or(env_db)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match url {
        Some(url) => Ok(url),
        None => bail!(
            "No database configured. Pass --db or set {} (e.g. sqlite://semana.db)",
            DB_URL_ENV
        ),
    }
}

/// Open the database, running migrations
pub fn open_db(db_url: &str) -> Result<Database> {
    Database::connect(db_url).with_context(|| format!("Failed to open database '{}'", db_url))
}

pub fn cmd_init(db_url: &str) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_url);

    let db = open_db(db_url)?;

    // Write the default budget book so it shows up on first load
    let book = db.load_budgets().context("Failed to load budget book")?;
    db.save_budgets(&book).context("Failed to save budget book")?;
    println!("   Default weekly budget: ${:.2}", book.default_amount());

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Log an expense: semana add 120 \"Super\"");
    println!("  2. Start web UI: semana serve");

    Ok(())
}

pub fn cmd_reset(db_url: &str, yes: bool) -> Result<()> {
    use std::io::{self, Write};

    if !yes {
        println!("⚠️  This will delete every expense and budget setting.");
        print!("Are you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let db = open_db(db_url)?;
    db.reset().context("Failed to reset database")?;

    println!("✅ Database reset complete.");
    Ok(())
}
