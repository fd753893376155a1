//! Storage interfaces
//!
//! The carry-over engine and [`Session`](crate::session::Session) only talk to
//! storage through these traits. [`Database`](crate::db::Database) implements
//! both over SQLite; tests use an in-memory store.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::budget::BudgetBook;
use crate::error::Result;
use crate::models::{Expense, NewExpense};
use crate::week::WeekKey;

/// Length of store-assigned identifiers, in hex characters
pub const IDENTIFIER_LEN: usize = 24;

/// Persistence for expense records
pub trait ExpenseStore {
    /// Store a new expense and return it with its assigned identifier
    fn insert(&self, expense: &NewExpense) -> Result<Expense>;

    /// All expenses attributed to `week`
    fn find_by_week(&self, week: WeekKey) -> Result<Vec<Expense>>;

    /// Every stored expense
    fn find_all(&self) -> Result<Vec<Expense>>;

    /// Remove an expense. Returns `false` when nothing matched.
    fn delete_by_id(&self, identifier: &str) -> Result<bool>;

    /// Insert or replace a record under its own identifier
    fn upsert(&self, expense: &Expense) -> Result<()>;
}

/// Persistence for the budget book
pub trait BudgetStore {
    /// The stored book, or the default book if none was saved yet
    fn load_budgets(&self) -> Result<BudgetBook>;

    fn save_budgets(&self, book: &BudgetBook) -> Result<()>;
}

/// Generate a fresh expense identifier.
///
/// Hashes the record content together with the insertion time and a process
/// counter so identical expenses logged in the same instant still differ.
pub fn generate_identifier(
    amount: f64,
    concept: &str,
    week: WeekKey,
    at: DateTime<Utc>,
) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut hasher = Sha256::new();
    hasher.update(amount.to_be_bytes());
    hasher.update(concept.as_bytes());
    hasher.update(week.to_string().as_bytes());
    hasher.update(at.timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
    hasher.update(std::process::id().to_be_bytes());
    hasher.update(seq.to_be_bytes());

    let mut id = hex::encode(hasher.finalize());
    id.truncate(IDENTIFIER_LEN);
    id
}
