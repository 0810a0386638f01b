use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{actor_id, check_auth, Pagination};
use crate::errors::AppError;
use crate::models::{
    Booking, BookingDetail, BookingFilter, BookingPatch, BookingStatus, NewBooking, Page, Payment,
};
use crate::services::orchestrator::BookingWithPayment;
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let booking = state.bookings.create(&input, actor_id(&headers)).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// POST /api/bookings/with-payment
pub async fn create_booking_with_payment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<NewBooking>,
) -> Result<(StatusCode, Json<BookingWithPayment>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let created = state
        .orchestrator
        .create_booking_with_payment(&input, actor_id(&headers))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/bookings
#[derive(Debug, Default, Deserialize)]
pub struct BookingsQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub id: Option<i64>,
    pub customer_id: Option<i64>,
    pub rate_price_id: Option<i64>,
    pub room_id: Option<i64>,
    pub room_type_id: Option<i64>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub total_amount: Option<Decimal>,
    pub created_on: Option<NaiveDate>,
    pub updated_on: Option<NaiveDate>,
    pub touched_on: Option<NaiveDate>,
}

impl BookingsQuery {
    fn filter(&self) -> BookingFilter {
        BookingFilter {
            id: self.id,
            customer_id: self.customer_id,
            rate_price_id: self.rate_price_id,
            room_id: self.room_id,
            room_type_id: self.room_type_id,
            check_in: self.check_in,
            check_out: self.check_out,
            status: self.status,
            total_amount: self.total_amount,
            created_on: self.created_on,
            updated_on: self.updated_on,
            touched_on: self.touched_on,
        }
    }
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Page<Booking>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let (skip, limit) = Pagination {
        skip: query.skip,
        limit: query.limit,
    }
    .resolve();
    let filter = query.filter();

    let page = if filter == BookingFilter::default() {
        state.bookings.list(skip, limit).await?
    } else {
        state.bookings.list_with_filter(&filter, skip, limit).await?
    };
    Ok(Json(page))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    Ok(Json(state.bookings.get(id).await?))
}

// GET /api/bookings/:id/detail
pub async fn get_booking_detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<BookingDetail>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    Ok(Json(state.bookings.get_detail(id).await?))
}

// GET /api/bookings/details
pub async fn list_booking_details(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Page<BookingDetail>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let (skip, limit) = pagination.resolve();
    Ok(Json(state.bookings.list_details(skip, limit).await?))
}

// GET /api/bookings/:id/payments
pub async fn list_booking_payments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Payment>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    state.bookings.get(id).await?;
    Ok(Json(state.payments.list_for_booking(id).await?))
}

// PUT /api/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<BookingPatch>,
) -> Result<Json<Booking>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let booking = state
        .bookings
        .update(id, &patch, actor_id(&headers))
        .await?;
    Ok(Json(booking))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    state.bookings.delete(id, actor_id(&headers)).await?;
    Ok(StatusCode::NO_CONTENT)
}
