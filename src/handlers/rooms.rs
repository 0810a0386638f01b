use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::{check_auth, Pagination};
use crate::errors::AppError;
use crate::models::{Page, RoomWithType};
use crate::state::AppState;

// GET /api/rooms/available
#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
}

pub async fn available_rooms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<RoomWithType>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let (Some(check_in), Some(check_out)) = (query.check_in, query.check_out) else {
        return Err(AppError::InvalidData(
            "check_in and check_out are required".to_string(),
        ));
    };

    let rooms = state
        .availability
        .get_available_rooms(check_in, check_out)
        .await?;
    Ok(Json(rooms))
}

// GET /api/rooms
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Page<RoomWithType>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let (skip, limit) = pagination.resolve();
    Ok(Json(
        state.availability.list_rooms_with_type(skip, limit).await?,
    ))
}
