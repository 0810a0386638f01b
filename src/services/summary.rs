use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{
    AuditAction, Booking, BookingStatus, DailyBookingSummary, Page, SummaryPolicy, SummaryStatus,
    SummaryTally,
};
use crate::services::audit::AuditRecorder;
use crate::store::{BookingStore, SummaryStore};

const SUMMARIES_TABLE: &str = "daily_booking_summary";

/// Buckets bookings by status. Only `revenue_statuses` add to the amount.
pub fn tally(bookings: &[Booking], revenue_statuses: &[BookingStatus]) -> SummaryTally {
    let mut tally = SummaryTally::default();

    for booking in bookings {
        tally.total_bookings += 1;
        match booking.status {
            BookingStatus::Pending => tally.pending_bookings += 1,
            BookingStatus::Confirmed => tally.confirmed_bookings += 1,
            BookingStatus::CheckedIn => tally.checked_in_bookings += 1,
            BookingStatus::CheckedOut => tally.checked_out_bookings += 1,
            BookingStatus::Canceled => tally.canceled_bookings += 1,
            BookingStatus::Completed => tally.completed_bookings += 1,
        }
        if revenue_statuses.contains(&booking.status) {
            tally.total_amount += booking.total_amount;
        }
        tally.booking_ids.push(booking.id);
    }

    tally.booking_ids.sort_unstable();
    tally.booking_ids.dedup();
    tally.total_amount = tally.total_amount.normalize();
    tally
}

pub struct SummaryService {
    bookings: Arc<dyn BookingStore>,
    summaries: Arc<dyn SummaryStore>,
    policy: SummaryPolicy,
    audit: AuditRecorder,
}

impl SummaryService {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        summaries: Arc<dyn SummaryStore>,
        policy: SummaryPolicy,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            bookings,
            summaries,
            policy,
            audit,
        }
    }

    /// Rebuilds the summary for `date` from scratch. Regenerating resets the
    /// review status to unchecked.
    pub async fn generate(
        &self,
        date: NaiveDate,
        actor: Option<i64>,
    ) -> Result<DailyBookingSummary, AppError> {
        let filter = self.policy.membership.filter_for(date);
        let page_size = self.policy.page_size.max(1);

        let mut bookings = vec![];
        let mut skip = 0;
        loop {
            let page = self
                .bookings
                .list_with_filter(&filter, skip, page_size)
                .await?;
            let fetched = page.items.len() as u64;
            bookings.extend(page.items);
            skip += fetched;
            if fetched < page_size || skip >= page.total {
                break;
            }
        }

        let tally = tally(&bookings, &self.policy.revenue_statuses);
        let summary = self
            .summaries
            .upsert(date, &tally, SummaryStatus::Unchecked)
            .await?;

        tracing::info!(
            %date,
            total_bookings = summary.tally.total_bookings,
            total_amount = %summary.tally.total_amount,
            "daily summary generated"
        );
        self.audit
            .record(AuditAction::Update, SUMMARIES_TABLE, 0, actor);
        Ok(summary)
    }

    pub async fn update_status(
        &self,
        date: NaiveDate,
        status: SummaryStatus,
        actor: Option<i64>,
    ) -> Result<DailyBookingSummary, AppError> {
        let updated = self
            .summaries
            .update_status(date, status)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::DataNotFound(_) => AppError::DataNotFound(format!("summary for {date}")),
                other => other,
            })?;

        tracing::info!(%date, status = ?status, "daily summary status changed");
        self.audit
            .record(AuditAction::Update, SUMMARIES_TABLE, 0, actor);
        Ok(updated)
    }

    pub async fn get_by_date(&self, date: NaiveDate) -> Result<DailyBookingSummary, AppError> {
        self.summaries
            .get_by_date(date)
            .await?
            .ok_or_else(|| AppError::DataNotFound(format!("summary for {date}")))
    }

    pub async fn list(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Page<DailyBookingSummary>, AppError> {
        Ok(self.summaries.list(skip, limit).await?)
    }

    pub async fn delete(&self, date: NaiveDate, actor: Option<i64>) -> Result<(), AppError> {
        self.summaries.delete(date).await.map_err(|e| match AppError::from(e) {
            AppError::DataNotFound(_) => AppError::DataNotFound(format!("summary for {date}")),
            other => other,
        })?;

        tracing::info!(%date, "daily summary deleted");
        self.audit
            .record(AuditAction::Delete, SUMMARIES_TABLE, 0, actor);
        Ok(())
    }
}
