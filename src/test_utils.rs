//! In-memory store doubles for service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use crate::models::{
    AuditEntry, Booking, BookingDetail, BookingDraft, BookingFilter, BookingPatch, Page,
    Payment, PaymentDraft, PaymentMethod,
};
use crate::store::{AuditSink, BookingStore, PaymentStore, StoreError};

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Booking store without transactions: `create_with_payment` keeps the
/// trait default, so callers take the compensation path.
#[derive(Default)]
pub struct RecordingBookingStore {
    bookings: Mutex<Vec<Booking>>,
    pub create_calls: AtomicUsize,
    pub deleted_ids: Mutex<Vec<i64>>,
    pub fail_delete: bool,
}

impl RecordingBookingStore {
    pub fn failing_delete() -> Self {
        Self {
            fail_delete: true,
            ..Default::default()
        }
    }

    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> Vec<i64> {
        self.deleted_ids.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }
}

#[async_trait]
impl BookingStore for RecordingBookingStore {
    async fn create(&self, draft: &BookingDraft) -> Result<Booking, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut bookings = self.bookings.lock().unwrap();
        let ts = now();
        let booking = Booking {
            id: bookings.len() as i64 + 1,
            customer_id: draft.customer_id,
            rate_price_id: draft.rate_price_id,
            room_id: draft.room_id,
            room_type_id: draft.room_type_id,
            check_in: draft.check_in,
            check_out: draft.check_out,
            status: draft.status,
            total_amount: draft.total_amount,
            created_at: ts,
            updated_at: ts,
        };
        bookings.push(booking.clone());
        Ok(booking)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Page<Booking>, StoreError> {
        self.list_with_filter(&BookingFilter::default(), skip, limit)
            .await
    }

    async fn list_with_filter(
        &self,
        filter: &BookingFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Page<Booking>, StoreError> {
        let bookings = self.bookings.lock().unwrap();
        let matching: Vec<_> = bookings
            .iter()
            .rev()
            .filter(|b| filter.status.map_or(true, |s| b.status == s))
            .filter(|b| filter.created_on.map_or(true, |d| b.created_at.date() == d))
            .cloned()
            .collect();
        Ok(Page {
            total: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(skip as usize)
                .take(limit as usize)
                .collect(),
        })
    }

    async fn update(&self, id: i64, patch: &BookingPatch) -> Result<Booking, StoreError> {
        let mut bookings = self.bookings.lock().unwrap();
        let slot = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(to) = patch.status {
            if to != slot.status && !slot.status.can_transition(to) {
                return Err(StoreError::InvalidTransition {
                    from: slot.status,
                    to,
                });
            }
        }
        *slot = Booking {
            updated_at: now(),
            ..patch.apply_to(slot)
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.deleted_ids.lock().unwrap().push(id);
        if self.fail_delete {
            return Err(StoreError::Poisoned);
        }
        let mut bookings = self.bookings.lock().unwrap();
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        if bookings.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_detail(&self, _id: i64) -> Result<Option<BookingDetail>, StoreError> {
        Ok(None)
    }

    async fn list_details(
        &self,
        _skip: u64,
        _limit: u64,
    ) -> Result<Page<BookingDetail>, StoreError> {
        Ok(Page {
            items: vec![],
            total: 0,
        })
    }
}

/// Payment store whose writes always fail.
#[derive(Default)]
pub struct FailingPaymentStore {
    pub create_calls: AtomicUsize,
}

#[async_trait]
impl PaymentStore for FailingPaymentStore {
    async fn create(&self, _booking_id: i64, _draft: &PaymentDraft) -> Result<Payment, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::CorruptRow("payments table unavailable".to_string()))
    }

    async fn get_by_id(&self, _id: i64) -> Result<Option<Payment>, StoreError> {
        Ok(None)
    }

    async fn finalize(&self, _id: i64, _method: PaymentMethod) -> Result<Payment, StoreError> {
        Err(StoreError::NotFound)
    }

    async fn delete(&self, _id: i64) -> Result<(), StoreError> {
        Err(StoreError::NotFound)
    }

    async fn list_for_booking(&self, _booking_id: i64) -> Result<Vec<Payment>, StoreError> {
        Ok(vec![])
    }
}

/// Collects audit entries; optionally fails the first `n` appends.
#[derive(Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
    attempts: AtomicUsize,
    fail_first: usize,
}

impl MemoryAuditSink {
    pub fn failing_first(n: usize) -> Self {
        Self {
            fail_first: n,
            ..Default::default()
        }
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_first {
            return Err(StoreError::Poisoned);
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}
