use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment::{PaymentMethod, PaymentStatus};
use super::stay::Stay;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub customer_id: i64,
    pub rate_price_id: i64,
    pub room_id: i64,
    pub room_type_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: BookingStatus,
    pub total_amount: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn stay(&self) -> Stay {
        Stay::new(self.check_in, self.check_out)
    }

    /// True when every mutable field matches `other`. Ids and timestamps are ignored.
    pub fn same_contents(&self, other: &Booking) -> bool {
        self.customer_id == other.customer_id
            && self.rate_price_id == other.rate_price_id
            && self.room_id == other.room_id
            && self.room_type_id == other.room_type_id
            && self.check_in == other.check_in
            && self.check_out == other.check_out
            && self.status == other.status
            && self.total_amount == other.total_amount
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Canceled,
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
        BookingStatus::CheckedOut,
        BookingStatus::Canceled,
        BookingStatus::Completed,
    ];

    /// Statuses that no longer hold their room.
    pub const INACTIVE: [BookingStatus; 2] = [BookingStatus::Canceled, BookingStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Canceled => "canceled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim().to_lowercase())
    }

    pub fn code(&self) -> i64 {
        match self {
            BookingStatus::Pending => 1,
            BookingStatus::Confirmed => 2,
            BookingStatus::CheckedIn => 3,
            BookingStatus::CheckedOut => 4,
            BookingStatus::Canceled => 5,
            BookingStatus::Completed => 6,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        BookingStatus::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn is_active(&self) -> bool {
        !BookingStatus::INACTIVE.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Canceled | BookingStatus::Completed)
    }

    /// Lifecycle edges. Staying in the same status is not a transition.
    pub fn can_transition(&self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed)
                | (Pending, Canceled)
                | (Confirmed, CheckedIn)
                | (Confirmed, Canceled)
                | (CheckedIn, CheckedOut)
                | (CheckedIn, Canceled)
                | (CheckedOut, Completed)
        )
    }
}

/// Caller input for creating a booking. Missing or zero fields are rejected
/// by validation before anything reaches a store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBooking {
    #[serde(default)]
    pub customer_id: i64,
    #[serde(default)]
    pub rate_price_id: i64,
    #[serde(default)]
    pub room_id: i64,
    #[serde(default)]
    pub room_type_id: i64,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    #[serde(default)]
    pub total_amount: Decimal,
    pub status: Option<BookingStatus>,
}

/// A validated booking ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub customer_id: i64,
    pub rate_price_id: i64,
    pub room_id: i64,
    pub room_type_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: BookingStatus,
    pub total_amount: Decimal,
}

impl BookingDraft {
    pub fn stay(&self) -> Stay {
        Stay::new(self.check_in, self.check_out)
    }
}

/// Partial update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BookingPatch {
    pub customer_id: Option<i64>,
    pub rate_price_id: Option<i64>,
    pub room_id: Option<i64>,
    pub room_type_id: Option<i64>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub total_amount: Option<Decimal>,
}

impl BookingPatch {
    /// The record as it would look after this patch is written.
    pub fn apply_to(&self, current: &Booking) -> Booking {
        Booking {
            customer_id: self.customer_id.unwrap_or(current.customer_id),
            rate_price_id: self.rate_price_id.unwrap_or(current.rate_price_id),
            room_id: self.room_id.unwrap_or(current.room_id),
            room_type_id: self.room_type_id.unwrap_or(current.room_type_id),
            check_in: self.check_in.unwrap_or(current.check_in),
            check_out: self.check_out.unwrap_or(current.check_out),
            status: self.status.unwrap_or(current.status),
            total_amount: self.total_amount.unwrap_or(current.total_amount),
            ..current.clone()
        }
    }
}

/// Equality filter over bookings. `None` matches anything; `Some` matches
/// exactly, zero values included.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BookingFilter {
    pub id: Option<i64>,
    pub customer_id: Option<i64>,
    pub rate_price_id: Option<i64>,
    pub room_id: Option<i64>,
    pub room_type_id: Option<i64>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub total_amount: Option<Decimal>,
    /// Calendar date of `created_at`.
    pub created_on: Option<NaiveDate>,
    /// Calendar date of `updated_at`.
    pub updated_on: Option<NaiveDate>,
    /// Created or last updated on this date.
    pub touched_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub room_number: String,
    pub room_type_name: Option<String>,
    pub payment: Option<PaymentOverview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentOverview {
    pub id: i64,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Booking {
        let ts = date("2024-06-01").and_hms_opt(9, 0, 0).unwrap();
        Booking {
            id: 7,
            customer_id: 1,
            rate_price_id: 2,
            room_id: 3,
            room_type_id: 4,
            check_in: date("2024-07-01"),
            check_out: date("2024-07-05"),
            status: BookingStatus::Confirmed,
            total_amount: dec!(400),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_status_codes_round_trip() {
        for status in BookingStatus::ALL {
            assert_eq!(BookingStatus::from_code(status.code()), Some(status));
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::from_code(0), None);
        assert_eq!(BookingStatus::parse("uncheck-in"), None);
    }

    #[test]
    fn test_only_canceled_and_completed_are_inactive() {
        let inactive: Vec<_> = BookingStatus::ALL
            .into_iter()
            .filter(|s| !s.is_active())
            .collect();
        assert_eq!(inactive, vec![BookingStatus::Canceled, BookingStatus::Completed]);
    }

    #[test]
    fn test_transition_graph() {
        use BookingStatus::*;
        assert!(Pending.can_transition(Confirmed));
        assert!(Confirmed.can_transition(CheckedIn));
        assert!(CheckedIn.can_transition(CheckedOut));
        assert!(CheckedOut.can_transition(Completed));
        assert!(Pending.can_transition(Canceled));
        assert!(CheckedIn.can_transition(Canceled));

        assert!(!Pending.can_transition(CheckedIn));
        assert!(!CheckedOut.can_transition(Canceled));
        assert!(!Confirmed.can_transition(Confirmed));
        for to in BookingStatus::ALL {
            assert!(!Canceled.can_transition(to));
            assert!(!Completed.can_transition(to));
        }
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let current = sample();
        let effective = BookingPatch::default().apply_to(&current);
        assert!(effective.same_contents(&current));
    }

    #[test]
    fn test_patch_overrides_only_supplied_fields() {
        let current = sample();
        let patch = BookingPatch {
            room_id: Some(9),
            total_amount: Some(dec!(0)),
            ..Default::default()
        };
        let effective = patch.apply_to(&current);
        assert_eq!(effective.room_id, 9);
        assert_eq!(effective.total_amount, dec!(0));
        assert_eq!(effective.customer_id, current.customer_id);
        assert_eq!(effective.id, current.id);
        assert!(!effective.same_contents(&current));
    }
}
