use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{
    AuditEntry, Booking, BookingDetail, BookingDraft, BookingFilter, BookingPatch, BookingStatus,
    DailyBookingSummary, Page, Payment, PaymentDraft, PaymentMethod, PaymentStatus, RoomWithType,
    Stay, SummaryStatus, SummaryTally,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("uniqueness violated: {0}")]
    Conflict(String),

    #[error("room {room_id} is already booked between {} and {}", .stay.check_in, .stay.check_out)]
    Overlap { room_id: i64, stay: Stay },

    #[error("cannot move booking from {} to {}", .from.as_str(), .to.as_str())]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("payment {id} is {status:?}, not pending")]
    PaymentNotPending { id: i64, status: PaymentStatus },

    #[error("corrupt row: {0}")]
    CorruptRow(String),

    #[error("database lock poisoned")]
    Poisoned,

    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                StoreError::Conflict(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, draft: &BookingDraft) -> Result<Booking, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Booking>, StoreError>;

    async fn list(&self, skip: u64, limit: u64) -> Result<Page<Booking>, StoreError>;

    async fn list_with_filter(
        &self,
        filter: &BookingFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Page<Booking>, StoreError>;

    /// Applies `patch` atomically. A status change is checked against the
    /// lifecycle graph using the status read inside the same write.
    async fn update(&self, id: i64, patch: &BookingPatch) -> Result<Booking, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn get_detail(&self, id: i64) -> Result<Option<BookingDetail>, StoreError>;

    async fn list_details(&self, skip: u64, limit: u64)
        -> Result<Page<BookingDetail>, StoreError>;

    /// Writes a booking and its opening payment as one unit. Stores without
    /// transactions return `Ok(None)` and callers fall back to compensation.
    async fn create_with_payment(
        &self,
        _draft: &BookingDraft,
        _payment: &PaymentDraft,
    ) -> Result<Option<(Booking, Payment)>, StoreError> {
        Ok(None)
    }
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn create(&self, booking_id: i64, draft: &PaymentDraft) -> Result<Payment, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Payment>, StoreError>;

    /// Marks a pending payment completed with `method`.
    async fn finalize(&self, id: i64, method: PaymentMethod) -> Result<Payment, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn list_for_booking(&self, booking_id: i64) -> Result<Vec<Payment>, StoreError>;
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Rooms in available status with no active booking overlapping `stay`.
    async fn available_rooms(&self, stay: &Stay) -> Result<Vec<RoomWithType>, StoreError>;

    async fn list_with_type(&self, skip: u64, limit: u64)
        -> Result<Page<RoomWithType>, StoreError>;
}

#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Insert or overwrite the row for `date`.
    async fn upsert(
        &self,
        date: NaiveDate,
        tally: &SummaryTally,
        status: SummaryStatus,
    ) -> Result<DailyBookingSummary, StoreError>;

    async fn get_by_date(&self, date: NaiveDate)
        -> Result<Option<DailyBookingSummary>, StoreError>;

    async fn list(&self, skip: u64, limit: u64) -> Result<Page<DailyBookingSummary>, StoreError>;

    /// Sets the review status only; counters are left as stored.
    async fn update_status(
        &self,
        date: NaiveDate,
        status: SummaryStatus,
    ) -> Result<DailyBookingSummary, StoreError>;

    async fn delete(&self, date: NaiveDate) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError>;
}
