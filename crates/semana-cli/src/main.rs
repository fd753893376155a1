//! Semana CLI - Weekly budget tracker
//!
//! Usage:
//!   semana init                      Initialize database
//!   semana add 120 "Super"           Log an expense
//!   semana overview --week 2024-05   Show a week's budget position
//!   semana serve --port 3000         Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    // No store configured is fatal for every command
    let db_url = commands::resolve_db_url(cli.db.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&db_url),
        Commands::Reset { yes } => commands::cmd_reset(&db_url, yes),
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => {
            commands::cmd_serve(
                &db_url,
                &host,
                port,
                static_dir.as_deref(),
                allowed_origins.as_deref(),
            )
            .await
        }
        Commands::Add {
            amount,
            concept,
            week,
            date,
        } => {
            let db = commands::open_db(&db_url)?;
            commands::cmd_add(db, amount, &concept, week.as_deref(), date.as_deref())
        }
        Commands::List { week, all, json } => {
            let db = commands::open_db(&db_url)?;
            commands::cmd_list(&db, &week, all, json)
        }
        Commands::Delete { identifier } => {
            let db = commands::open_db(&db_url)?;
            commands::cmd_delete(db, &identifier)
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&db_url)?;
            match action {
                None => commands::cmd_budget_show(&db, "current"),
                Some(BudgetAction::Show { week }) => commands::cmd_budget_show(&db, &week),
                Some(BudgetAction::Set {
                    amount,
                    scope,
                    week,
                }) => commands::cmd_budget_set(db, amount, &scope, &week),
            }
        }
        Commands::Overview { week, json } => {
            let db = commands::open_db(&db_url)?;
            commands::cmd_overview(&db, &week, json)
        }
        Commands::Weeks { from, to } => commands::cmd_weeks(from.as_deref(), to.as_deref()),
        Commands::WeekOf { date } => commands::cmd_week_of(date.as_deref()),
        Commands::Verse { date } => commands::cmd_verse(date.as_deref()),
    }
}
