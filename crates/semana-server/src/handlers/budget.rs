//! Budget handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{parse_body, parse_week, sync_after_write};
use crate::{AppError, AppState};
use semana_core::{current_week, BudgetBook, BudgetScope, BudgetStore, WeekKey};

/// Query parameters for reading the budget
#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    pub week: Option<String>,
}

/// Request body for a budget edit
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    pub amount: f64,
    pub scope: BudgetScope,
    /// Week the edit is made at; defaults to the current week
    pub week: Option<String>,
}

/// Budget position for one week plus the whole book
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub week: WeekKey,
    /// Budget in effect for `week`
    pub amount: f64,
    /// Most recently set default
    pub default: f64,
    pub override_amount: Option<f64>,
    pub book: BudgetBook,
}

impl BudgetResponse {
    fn new(week: WeekKey, book: &BudgetBook) -> Self {
        Self {
            week,
            amount: book.budget_for(week),
            default: book.default_amount(),
            override_amount: book.override_for(week),
            book: book.clone(),
        }
    }
}

fn week_or_current(raw: Option<&str>) -> Result<WeekKey, AppError> {
    raw.map(parse_week)
        .transpose()
        .map(|week| week.unwrap_or_else(current_week))
}

/// GET /api/budget - Budget for a week (defaults to the current week)
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BudgetQuery>,
) -> Result<Json<BudgetResponse>, AppError> {
    let week = week_or_current(params.week.as_deref())?;
    let budgets = state.budgets.read().await;
    Ok(Json(BudgetResponse::new(week, &budgets)))
}

/// PUT /api/budget - Set the budget for one week or from a week on
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<BudgetResponse>, AppError> {
    let req: UpdateBudgetRequest = parse_body(&body)?;
    let week = week_or_current(req.week.as_deref())?;

    let response = {
        let mut budgets = state.budgets.write().await;

        // Edit a copy so a failed save leaves the shared book untouched
        let mut updated = budgets.clone();
        updated
            .set_budget(req.amount, req.scope, week)
            .map_err(AppError::from_core)?;
        state.db.save_budgets(&updated)?;
        *budgets = updated;

        BudgetResponse::new(week, &budgets)
    };
    info!(
        "Budget set to {:.2} ({}) at week {}",
        req.amount, req.scope, week
    );

    sync_after_write(&state).await;

    Ok(Json(response))
}
