//! Semana Core Library
//!
//! Shared functionality for the Semana weekly budget tracker:
//! - ISO week keys and the week selector
//! - Budget book (default budget, scheduled defaults, per-week overrides)
//! - Deficit carry-over between weeks
//! - Weekly summary and verse of the day
//! - Storage traits with a pooled SQLite implementation
//! - Optimistic command session over a store

pub mod budget;
pub mod carry_over;
pub mod db;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod summary;
pub mod verse;
pub mod week;

/// Test utilities including an in-memory store
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use budget::{BudgetBook, BudgetOverride, BudgetScope, DEFAULT_WEEKLY_BUDGET};
pub use carry_over::{carry_over, reconcile, sync_store, CarryOverReport, MAX_RECONCILE_PASSES};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{Expense, NewExpense, Verse};
pub use session::{Command, CommandOutcome, Session};
pub use store::{BudgetStore, ExpenseStore};
pub use summary::{WeekOverview, WeeklySummary};
pub use verse::{verse_for, verse_of_the_day};
pub use week::{
    current_week, week_key_of, week_key_of_instant, week_selector, weeks_between, WeekKey,
    WeekRange,
};
