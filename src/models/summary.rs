use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::booking::{BookingFilter, BookingStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyBookingSummary {
    pub summary_date: NaiveDate,
    #[serde(flatten)]
    pub tally: SummaryTally,
    pub status: SummaryStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Counters and amounts derived from one day's bookings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SummaryTally {
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub confirmed_bookings: i64,
    pub checked_in_bookings: i64,
    pub checked_out_bookings: i64,
    pub canceled_bookings: i64,
    pub completed_bookings: i64,
    pub total_amount: Decimal,
    pub booking_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    Unchecked,
    Checked,
    Confirmed,
}

impl SummaryStatus {
    pub fn code(&self) -> i64 {
        match self {
            SummaryStatus::Unchecked => 0,
            SummaryStatus::Checked => 1,
            SummaryStatus::Confirmed => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(SummaryStatus::Unchecked),
            1 => Some(SummaryStatus::Checked),
            2 => Some(SummaryStatus::Confirmed),
            _ => None,
        }
    }
}

/// Which timestamp places a booking in a day's summary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMembership {
    Created,
    Updated,
    CreatedOrUpdated,
    CheckIn,
}

impl SummaryMembership {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "created" => Some(SummaryMembership::Created),
            "updated" => Some(SummaryMembership::Updated),
            "created_or_updated" => Some(SummaryMembership::CreatedOrUpdated),
            "check_in" => Some(SummaryMembership::CheckIn),
            _ => None,
        }
    }

    pub fn filter_for(&self, date: NaiveDate) -> BookingFilter {
        match self {
            SummaryMembership::Created => BookingFilter {
                created_on: Some(date),
                ..Default::default()
            },
            SummaryMembership::Updated => BookingFilter {
                updated_on: Some(date),
                ..Default::default()
            },
            SummaryMembership::CreatedOrUpdated => BookingFilter {
                touched_on: Some(date),
                ..Default::default()
            },
            SummaryMembership::CheckIn => BookingFilter {
                check_in: Some(date),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPolicy {
    pub membership: SummaryMembership,
    /// Statuses whose amounts count as realized revenue.
    pub revenue_statuses: Vec<BookingStatus>,
    pub page_size: u64,
}

impl Default for SummaryPolicy {
    fn default() -> Self {
        Self {
            membership: SummaryMembership::Created,
            revenue_statuses: vec![BookingStatus::Completed],
            page_size: 500,
        }
    }
}
