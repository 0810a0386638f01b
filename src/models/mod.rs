pub mod audit;
pub mod booking;
pub mod payment;
pub mod room;
pub mod stay;
pub mod summary;

use serde::Serialize;

pub use audit::{AuditAction, AuditEntry};
pub use booking::{
    Booking, BookingDetail, BookingDraft, BookingFilter, BookingPatch, BookingStatus, NewBooking,
    PaymentOverview,
};
pub use payment::{Payment, PaymentDraft, PaymentMethod, PaymentStatus};
pub use room::{RoomStatus, RoomWithType};
pub use stay::Stay;
pub use summary::{
    DailyBookingSummary, SummaryMembership, SummaryPolicy, SummaryStatus, SummaryTally,
};

/// One page of results plus the number of rows matching without skip/limit.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}
