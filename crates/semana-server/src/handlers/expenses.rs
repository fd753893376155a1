//! Expense handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::{parse_body, parse_week, sync_after_write};
use crate::{AppError, AppState, MessageResponse};
use semana_core::{Expense, ExpenseStore, NewExpense};

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    /// Restrict to one week (`YYYY-WW`)
    pub week: Option<String>,
}

/// Request body for deleting an expense
#[derive(Debug, Deserialize)]
pub struct DeleteExpenseRequest {
    #[serde(alias = "id")]
    pub identifier: Option<String>,
}

/// GET /api/expenses - List expenses, optionally for one week
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let expenses = match params.week.as_deref() {
        Some(week) => state.db.find_by_week(parse_week(week)?)?,
        None => state.db.find_all()?,
    };
    Ok(Json(expenses))
}

/// POST /api/expenses - Log a new expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let new: NewExpense = parse_body(&body)?;
    let stored = state.db.insert(&new).map_err(AppError::from_core)?;
    info!(
        "Logged expense {} ({:.2}) in week {}",
        stored.identifier,
        stored.amount,
        stored.week_key()
    );

    sync_after_write(&state).await;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /api/expenses/:identifier - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    remove_expense(&state, &identifier).await
}

/// DELETE /api/expenses - Delete the expense named in the body
pub async fn delete_expense_by_body(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    if body.is_empty() {
        return Err(AppError::bad_request("Expense identifier is required"));
    }
    let req: DeleteExpenseRequest = parse_body(&body)?;
    let identifier = req.identifier.unwrap_or_default();
    remove_expense(&state, &identifier).await
}

async fn remove_expense(
    state: &AppState,
    identifier: &str,
) -> Result<Json<MessageResponse>, AppError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(AppError::bad_request("Expense identifier is required"));
    }

    if !state.db.delete_by_id(identifier)? {
        return Err(AppError::not_found("Expense not found"));
    }
    info!("Deleted expense {}", identifier);

    sync_after_write(state).await;

    Ok(Json(MessageResponse {
        message: "Expense deleted".to_string(),
    }))
}
