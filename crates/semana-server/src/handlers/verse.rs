//! Verse of the day and health

use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use semana_core::verse_for;

#[derive(Debug, Serialize)]
pub struct VerseResponse {
    pub date: NaiveDate,
    pub reference: &'static str,
    pub text: &'static str,
}

/// GET /api/verse - Verse of the day (UTC)
pub async fn get_verse() -> Json<VerseResponse> {
    let date = Utc::now().date_naive();
    let verse = verse_for(date);
    Json(VerseResponse {
        date,
        reference: verse.reference,
        text: verse.text,
    })
}

/// GET /health - Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
