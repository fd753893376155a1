//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod budget;
pub mod expenses;
pub mod verse;
pub mod weeks;

// Re-export all handlers for use in router
pub use budget::*;
pub use expenses::*;
pub use verse::*;
pub use weeks::*;

use chrono::Utc;
use semana_core::{sync_store, Expense, WeekKey};
use tracing::warn;

use crate::{AppError, AppState};

/// Parse a `YYYY-WW` path or query value, or `current`
pub(crate) fn parse_week(raw: &str) -> Result<WeekKey, AppError> {
    if raw.eq_ignore_ascii_case("current") {
        return Ok(semana_core::current_week());
    }
    raw.parse().map_err(AppError::from_core)
}

/// Parse a JSON request body, turning any failure into a 400
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

/// Reconcile carry-overs against the store and return every expense.
///
/// Syncs are serialized through `AppState::sync_lock`, so the last one to
/// run always sees every write that finished before it.
pub(crate) async fn reconciled_expenses(state: &AppState) -> Result<Vec<Expense>, AppError> {
    let _sync = state.sync_lock.lock().await;
    let budgets = state.budgets.read().await;
    let (expenses, _) = sync_store(&state.db, &budgets, Utc::now())?;
    Ok(expenses)
}

/// Carry-over sync after a write; the write itself already succeeded
pub(crate) async fn sync_after_write(state: &AppState) {
    let _sync = state.sync_lock.lock().await;
    let budgets = state.budgets.read().await;
    if let Err(e) = sync_store(&state.db, &budgets, Utc::now()) {
        warn!("Carry-over sync after write failed: {}", e);
    }
}
