//! Report endpoints.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use backoffice_core::Sale;

use crate::error::ApiResult;
use crate::state::AppState;

/// `?startDate=2026-03-01&endDate=2026-03-31` (ISO dates, both included)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// `?ano=2026&mes=3`
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub ano: i32,
    pub mes: u32,
}

pub async fn by_date(
    State(state): State<AppState>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Sale>>> {
    let Query(q) = query?;
    Ok(Json(state.reports().by_date(q.start_date, q.end_date).await?))
}

pub async fn by_month(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Sale>>> {
    let Query(q) = query?;
    Ok(Json(state.reports().by_month(q.ano, q.mes).await?))
}

pub async fn current_week(State(state): State<AppState>) -> ApiResult<Json<Vec<Sale>>> {
    Ok(Json(state.reports().current_week().await?))
}
