use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::{actor_id, check_auth, Pagination};
use crate::errors::AppError;
use crate::models::{DailyBookingSummary, Page, SummaryStatus};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

impl DateQuery {
    fn required(&self) -> Result<NaiveDate, AppError> {
        self.date
            .ok_or_else(|| AppError::InvalidData("date is required".to_string()))
    }
}

// POST /api/daily-summary/generate
pub async fn generate_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyBookingSummary>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let summary = state
        .summaries
        .generate(query.required()?, actor_id(&headers))
        .await?;
    Ok(Json(summary))
}

// PUT /api/daily-summary/status
#[derive(Deserialize)]
pub struct StatusUpdate {
    pub date: NaiveDate,
    pub status: SummaryStatus,
}

pub async fn update_summary_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<DailyBookingSummary>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let summary = state
        .summaries
        .update_status(body.date, body.status, actor_id(&headers))
        .await?;
    Ok(Json(summary))
}

// GET /api/daily-summary
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyBookingSummary>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    Ok(Json(state.summaries.get_by_date(query.required()?).await?))
}

// GET /api/daily-summary/list
pub async fn list_summaries(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Page<DailyBookingSummary>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let (skip, limit) = pagination.resolve();
    Ok(Json(state.summaries.list(skip, limit).await?))
}

// DELETE /api/daily-summary
pub async fn delete_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DateQuery>,
) -> Result<StatusCode, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    state
        .summaries
        .delete(query.required()?, actor_id(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
