//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (resolve_db_url, open_db) and init
//! - `serve` - Web server command
//! - `expenses` - Expense commands (add, list, delete)
//! - `budget` - Budget commands (show, set)
//! - `weeks` - Week commands (overview, weeks, week-of)
//! - `verse` - Verse of the day

pub mod budget;
pub mod core;
pub mod expenses;
pub mod serve;
pub mod verse;
pub mod weeks;

// Re-export command functions for main.rs
pub use budget::*;
pub use core::*;
pub use expenses::*;
pub use serve::*;
pub use verse::*;
pub use weeks::*;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use semana_core::{current_week, WeekKey};

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a week argument (`YYYY-WW` or `current`)
pub fn parse_week_arg(raw: &str) -> Result<WeekKey> {
    if raw.eq_ignore_ascii_case("current") {
        return Ok(current_week());
    }
    raw.parse::<WeekKey>()
        .with_context(|| format!("Invalid week '{}'", raw))
}

/// Parse a date argument (`YYYY-MM-DD`)
pub fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", raw))
}

/// Format an amount with a colour: red when nothing is left
pub fn format_remaining(remaining: f64) -> String {
    if remaining <= 0.0 {
        format!("\x1b[31m${:.2}\x1b[0m", remaining)
    } else {
        format!("\x1b[32m${:.2}\x1b[0m", remaining)
    }
}
