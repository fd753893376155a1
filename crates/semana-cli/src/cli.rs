//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Semana - Weekly budget tracker
#[derive(Parser)]
#[command(name = "semana")]
#[command(about = "Weekly budget tracker with deficit carry-over", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database connection string (`sqlite://path` or a plain path)
    ///
    /// Falls back to the SEMANA_DB environment variable.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Delete every expense and budget setting
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origins, comma separated
        #[arg(long)]
        allowed_origins: Option<String>,
    },

    /// Log an expense
    Add {
        /// Amount spent
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// What it was for
        concept: String,

        /// Week to attribute it to (YYYY-WW); derived from --date otherwise
        #[arg(short, long)]
        week: Option<String>,

        /// Date of the expense (YYYY-MM-DD); defaults to now
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List expenses
    List {
        /// Week to list (YYYY-WW or "current")
        #[arg(short, long, default_value = "current")]
        week: String,

        /// List every stored expense instead of one week
        #[arg(long)]
        all: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete an expense
    Delete {
        /// Expense identifier
        identifier: String,
    },

    /// Show or change the weekly budget
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },

    /// Show a week's budget position and summary
    Overview {
        /// Week to show (YYYY-WW or "current")
        #[arg(short, long, default_value = "current")]
        week: String,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List selectable weeks with their date ranges
    Weeks {
        /// First week (defaults to week 1 of this year)
        #[arg(long)]
        from: Option<String>,

        /// Last week (defaults to the last week of 2030)
        #[arg(long)]
        to: Option<String>,
    },

    /// Show the ISO week a date belongs to
    WeekOf {
        /// Date (YYYY-MM-DD); defaults to today
        date: Option<String>,
    },

    /// Show the verse of the day
    Verse {
        /// Date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Show the budget for a week
    Show {
        /// Week (YYYY-WW or "current")
        #[arg(short, long, default_value = "current")]
        week: String,
    },
    /// Set the budget for one week or from a week on
    Set {
        /// New budget amount
        amount: f64,

        /// Scope: this_week or all_future
        #[arg(short, long, default_value = "this_week")]
        scope: String,

        /// Week the change applies at (YYYY-WW or "current")
        #[arg(short, long, default_value = "current")]
        week: String,
    },
}
