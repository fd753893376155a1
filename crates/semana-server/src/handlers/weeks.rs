//! Week overview and week selector handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{parse_week, reconciled_expenses};
use crate::{AppError, AppState};
use semana_core::{week_selector, WeekOverview, WeekRange};

/// Query parameters for the week selector
#[derive(Debug, Deserialize)]
pub struct WeeksQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /api/weeks/:week - Budget overview of one week (`YYYY-WW` or `current`)
pub async fn get_week(
    State(state): State<Arc<AppState>>,
    Path(week): Path<String>,
) -> Result<Json<WeekOverview>, AppError> {
    let week = parse_week(&week)?;
    let expenses = reconciled_expenses(&state).await?;

    let budgets = state.budgets.read().await;
    Ok(Json(WeekOverview::build(week, &expenses, &budgets)))
}

/// GET /api/weeks - Selectable weeks with their date ranges
pub async fn list_weeks(
    Query(params): Query<WeeksQuery>,
) -> Result<Json<Vec<WeekRange>>, AppError> {
    let from = params.from.as_deref().map(parse_week).transpose()?;
    let to = params.to.as_deref().map(parse_week).transpose()?;

    let weeks = week_selector(from, to).map_err(AppError::from_core)?;
    Ok(Json(weeks))
}
