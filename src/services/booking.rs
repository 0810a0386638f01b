use std::sync::Arc;

use rust_decimal::Decimal;

use crate::errors::AppError;
use crate::models::{
    AuditAction, Booking, BookingDetail, BookingDraft, BookingFilter, BookingPatch, BookingStatus,
    NewBooking, Page,
};
use crate::services::audit::AuditRecorder;
use crate::store::BookingStore;

pub const BOOKINGS_TABLE: &str = "bookings";

/// Checks caller input and produces a draft ready for a store. Nothing is
/// written here, so a rejected booking never reaches storage.
pub fn validate_new_booking(input: &NewBooking) -> Result<BookingDraft, AppError> {
    if input.customer_id == 0 {
        return Err(AppError::InvalidData("customer_id is required".to_string()));
    }
    if input.rate_price_id == 0 {
        return Err(AppError::InvalidData("rate_price_id is required".to_string()));
    }
    if input.room_id == 0 {
        return Err(AppError::InvalidData("room_id is required".to_string()));
    }
    let check_in = input
        .check_in
        .ok_or_else(|| AppError::InvalidData("check_in is required".to_string()))?;
    let check_out = input
        .check_out
        .ok_or_else(|| AppError::InvalidData("check_out is required".to_string()))?;
    if check_out <= check_in {
        return Err(AppError::InvalidData(
            "check_out must be after check_in".to_string(),
        ));
    }
    if input.total_amount <= Decimal::ZERO {
        return Err(AppError::InvalidData(
            "total_amount must be positive".to_string(),
        ));
    }

    let status = input.status.unwrap_or(BookingStatus::Pending);
    if status.is_terminal() {
        return Err(AppError::InvalidData(format!(
            "a booking cannot start as {}",
            status.as_str()
        )));
    }

    Ok(BookingDraft {
        customer_id: input.customer_id,
        rate_price_id: input.rate_price_id,
        room_id: input.room_id,
        room_type_id: input.room_type_id,
        check_in,
        check_out,
        status,
        total_amount: input.total_amount,
    })
}

/// Rules an updated booking must still satisfy, given the stored one.
fn validate_change(current: &Booking, next: &Booking) -> Result<(), AppError> {
    if next.status != current.status && !current.status.can_transition(next.status) {
        return Err(AppError::InvalidData(format!(
            "cannot move booking from {} to {}",
            current.status.as_str(),
            next.status.as_str()
        )));
    }
    if next.check_out <= next.check_in {
        return Err(AppError::InvalidData(
            "check_out must be after check_in".to_string(),
        ));
    }
    if next.total_amount <= Decimal::ZERO {
        return Err(AppError::InvalidData(
            "total_amount must be positive".to_string(),
        ));
    }
    if next.customer_id == 0 || next.rate_price_id == 0 || next.room_id == 0 {
        return Err(AppError::InvalidData(
            "customer_id, rate_price_id and room_id cannot be cleared".to_string(),
        ));
    }
    Ok(())
}

pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    audit: AuditRecorder,
}

impl BookingService {
    pub fn new(bookings: Arc<dyn BookingStore>, audit: AuditRecorder) -> Self {
        Self { bookings, audit }
    }

    pub async fn create(&self, input: &NewBooking, actor: Option<i64>) -> Result<Booking, AppError> {
        let draft = validate_new_booking(input)?;
        let booking = self.bookings.create(&draft).await?;

        tracing::info!(booking_id = booking.id, room_id = booking.room_id, "booking created");
        self.audit
            .record(AuditAction::Create, BOOKINGS_TABLE, booking.id, actor);
        Ok(booking)
    }

    pub async fn get(&self, id: i64) -> Result<Booking, AppError> {
        self.bookings
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::DataNotFound(format!("booking {id}")))
    }

    pub async fn get_detail(&self, id: i64) -> Result<BookingDetail, AppError> {
        self.bookings
            .get_detail(id)
            .await?
            .ok_or_else(|| AppError::DataNotFound(format!("booking {id}")))
    }

    /// Bookings with room, room type and latest payment, newest first.
    pub async fn list_details(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Page<BookingDetail>, AppError> {
        Ok(self.bookings.list_details(skip, limit).await?)
    }

    pub async fn list(&self, skip: u64, limit: u64) -> Result<Page<Booking>, AppError> {
        Ok(self.bookings.list(skip, limit).await?)
    }

    pub async fn list_with_filter(
        &self,
        filter: &BookingFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Page<Booking>, AppError> {
        Ok(self.bookings.list_with_filter(filter, skip, limit).await?)
    }

    /// Applies `patch` to an existing booking. A patch that leaves every
    /// field as stored yields `NoUpdatedData` and writes nothing.
    pub async fn update(
        &self,
        id: i64,
        patch: &BookingPatch,
        actor: Option<i64>,
    ) -> Result<Booking, AppError> {
        let current = self.get(id).await?;
        let next = patch.apply_to(&current);
        if next.same_contents(&current) {
            return Err(AppError::NoUpdatedData);
        }
        validate_change(&current, &next)?;

        let updated = self.bookings.update(id, patch).await?;

        tracing::info!(
            booking_id = id,
            status = updated.status.as_str(),
            "booking updated"
        );
        self.audit
            .record(AuditAction::Update, BOOKINGS_TABLE, id, actor);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64, actor: Option<i64>) -> Result<(), AppError> {
        self.bookings.delete(id).await.map_err(|e| match AppError::from(e) {
            AppError::DataNotFound(_) => AppError::DataNotFound(format!("booking {id}")),
            other => other,
        })?;

        tracing::info!(booking_id = id, "booking deleted");
        self.audit
            .record(AuditAction::Delete, BOOKINGS_TABLE, id, actor);
        Ok(())
    }
}
