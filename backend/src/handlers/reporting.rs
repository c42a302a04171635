//! HTTP handlers for reporting endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::reporting::DailyIntakeRow;
use crate::services::ReportingService;
use crate::AppState;

/// Query parameters for the daily intake report
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Local calendar day; defaults to today at the farm
    pub date: Option<NaiveDate>,
}

/// Per-supplier intake summary for one day
pub async fn daily_intake_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<DailyIntakeRow>>> {
    let date = query
        .date
        .unwrap_or_else(|| state.day_boundary.local_date(Utc::now()));
    let service = ReportingService::new(state.db);
    let rows = service.daily_intake(date, state.day_boundary).await?;
    Ok(Json(rows))
}

/// The daily intake summary as a CSV download
pub async fn daily_intake_csv(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let date = query
        .date
        .unwrap_or_else(|| state.day_boundary.local_date(Utc::now()));
    let service = ReportingService::new(state.db);
    let csv = service.daily_intake_csv(date, state.day_boundary).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"daily-intake-{}.csv\"", date),
            ),
        ],
        csv,
    ))
}
