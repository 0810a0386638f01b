pub mod migrations;
pub mod queries;

use std::sync::{Arc, Mutex};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};

use crate::models::{
    AuditEntry, Booking, BookingDetail, BookingDraft, BookingFilter, BookingPatch,
    DailyBookingSummary, Page, Payment, PaymentDraft, PaymentMethod, RoomWithType, Stay,
    SummaryStatus, SummaryTally,
};
use crate::store::{
    AuditSink, BookingStore, PaymentStore, RoomStore, StoreError, SummaryStore,
};

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// SQLite-backed implementation of every store trait, sharing one connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        Ok(Self::new(init_db(path)?))
    }

    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&mut conn)
    }

    pub fn ping(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn create(&self, draft: &BookingDraft) -> Result<Booking, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if draft.status.is_active() {
                queries::ensure_room_free(&tx, draft.room_id, &draft.stay(), None)?;
            }
            let booking = queries::insert_booking(&tx, draft, now())?;
            tx.commit()?;
            Ok(booking)
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Booking>, StoreError> {
        self.with_conn(|conn| queries::get_booking_by_id(conn, id))
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Page<Booking>, StoreError> {
        self.with_conn(|conn| queries::list_bookings(conn, &BookingFilter::default(), skip, limit))
    }

    async fn list_with_filter(
        &self,
        filter: &BookingFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Page<Booking>, StoreError> {
        self.with_conn(|conn| queries::list_bookings(conn, filter, skip, limit))
    }

    async fn update(&self, id: i64, patch: &BookingPatch) -> Result<Booking, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let current = queries::get_booking_by_id(&tx, id)?.ok_or(StoreError::NotFound)?;
            if let Some(to) = patch.status {
                if to != current.status && !current.status.can_transition(to) {
                    return Err(StoreError::InvalidTransition {
                        from: current.status,
                        to,
                    });
                }
            }
            let effective = patch.apply_to(&current);
            if effective.status.is_active() {
                queries::ensure_room_free(&tx, effective.room_id, &effective.stay(), Some(id))?;
            }
            if !queries::update_booking(&tx, id, patch, now())? {
                return Err(StoreError::NotFound);
            }
            let updated = queries::get_booking_by_id(&tx, id)?.ok_or(StoreError::NotFound)?;
            tx.commit()?;
            Ok(updated)
        })
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.with_conn(|conn| match queries::delete_booking(conn, id)? {
            true => Ok(()),
            false => Err(StoreError::NotFound),
        })
    }

    async fn get_detail(&self, id: i64) -> Result<Option<BookingDetail>, StoreError> {
        self.with_conn(|conn| queries::get_booking_detail(conn, id))
    }

    async fn list_details(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Page<BookingDetail>, StoreError> {
        self.with_conn(|conn| queries::list_booking_details(conn, skip, limit))
    }

    async fn create_with_payment(
        &self,
        draft: &BookingDraft,
        payment: &PaymentDraft,
    ) -> Result<Option<(Booking, Payment)>, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if draft.status.is_active() {
                queries::ensure_room_free(&tx, draft.room_id, &draft.stay(), None)?;
            }
            let ts = now();
            let booking = queries::insert_booking(&tx, draft, ts)?;
            let payment = queries::insert_payment(&tx, booking.id, payment, ts)?;
            tx.commit()?;
            Ok(Some((booking, payment)))
        })
    }
}

#[async_trait]
impl PaymentStore for SqliteStore {
    async fn create(&self, booking_id: i64, draft: &PaymentDraft) -> Result<Payment, StoreError> {
        self.with_conn(|conn| queries::insert_payment(conn, booking_id, draft, now()))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Payment>, StoreError> {
        self.with_conn(|conn| queries::get_payment_by_id(conn, id))
    }

    async fn finalize(&self, id: i64, method: PaymentMethod) -> Result<Payment, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if !queries::finalize_payment(&tx, id, method, now())? {
                let current = queries::get_payment_by_id(&tx, id)?.ok_or(StoreError::NotFound)?;
                return Err(StoreError::PaymentNotPending {
                    id,
                    status: current.status,
                });
            }
            let payment = queries::get_payment_by_id(&tx, id)?.ok_or(StoreError::NotFound)?;
            tx.commit()?;
            Ok(payment)
        })
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.with_conn(|conn| match queries::delete_payment(conn, id)? {
            true => Ok(()),
            false => Err(StoreError::NotFound),
        })
    }

    async fn list_for_booking(&self, booking_id: i64) -> Result<Vec<Payment>, StoreError> {
        self.with_conn(|conn| queries::list_payments_for_booking(conn, booking_id))
    }
}

#[async_trait]
impl RoomStore for SqliteStore {
    async fn available_rooms(&self, stay: &Stay) -> Result<Vec<RoomWithType>, StoreError> {
        self.with_conn(|conn| queries::available_rooms(conn, stay))
    }

    async fn list_with_type(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Page<RoomWithType>, StoreError> {
        self.with_conn(|conn| queries::list_rooms_with_type(conn, skip, limit))
    }
}

#[async_trait]
impl SummaryStore for SqliteStore {
    async fn upsert(
        &self,
        date: NaiveDate,
        tally: &SummaryTally,
        status: SummaryStatus,
    ) -> Result<DailyBookingSummary, StoreError> {
        self.with_conn(|conn| queries::upsert_summary(conn, date, tally, status, now()))
    }

    async fn get_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<DailyBookingSummary>, StoreError> {
        self.with_conn(|conn| queries::get_summary(conn, date))
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Page<DailyBookingSummary>, StoreError> {
        self.with_conn(|conn| queries::list_summaries(conn, skip, limit))
    }

    async fn update_status(
        &self,
        date: NaiveDate,
        status: SummaryStatus,
    ) -> Result<DailyBookingSummary, StoreError> {
        self.with_conn(|conn| {
            if !queries::update_summary_status(conn, date, status, now())? {
                return Err(StoreError::NotFound);
            }
            queries::get_summary(conn, date)?.ok_or(StoreError::NotFound)
        })
    }

    async fn delete(&self, date: NaiveDate) -> Result<(), StoreError> {
        self.with_conn(|conn| match queries::delete_summary(conn, date)? {
            true => Ok(()),
            false => Err(StoreError::NotFound),
        })
    }
}

#[async_trait]
impl AuditSink for SqliteStore {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        self.with_conn(|conn| queries::insert_log(conn, entry).map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, PaymentStatus, RoomStatus};
    use rust_decimal_macros::dec;

    fn store_with_room() -> (SqliteStore, i64) {
        let store = SqliteStore::open(":memory:").unwrap();
        let room_id = store
            .with_conn(|conn| {
                let type_id = queries::insert_room_type(conn, "Standard")?;
                queries::insert_room(conn, "201", type_id, RoomStatus::Available, 2)
            })
            .unwrap();
        (store, room_id)
    }

    fn draft(room_id: i64, check_in: &str, check_out: &str) -> BookingDraft {
        BookingDraft {
            customer_id: 1,
            rate_price_id: 1,
            room_id,
            room_type_id: 1,
            check_in: NaiveDate::parse_from_str(check_in, "%Y-%m-%d").unwrap(),
            check_out: NaiveDate::parse_from_str(check_out, "%Y-%m-%d").unwrap(),
            status: BookingStatus::Confirmed,
            total_amount: dec!(300),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_overlap() {
        let (store, room) = store_with_room();
        BookingStore::create(&store, &draft(room, "2024-01-01", "2024-01-05"))
            .await
            .unwrap();

        let err = BookingStore::create(&store, &draft(room, "2024-01-04", "2024-01-06"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Overlap { .. }));

        BookingStore::create(&store, &draft(room, "2024-01-05", "2024-01-06"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_canceled_booking_frees_room_for_update() {
        let (store, room) = store_with_room();
        let first = BookingStore::create(&store, &draft(room, "2024-01-01", "2024-01-05"))
            .await
            .unwrap();
        let second = BookingStore::create(&store, &draft(room, "2024-01-05", "2024-01-08"))
            .await
            .unwrap();

        let extend = BookingPatch {
            check_out: NaiveDate::from_ymd_opt(2024, 1, 6),
            ..Default::default()
        };
        let err = BookingStore::update(&store, first.id, &extend).await.unwrap_err();
        assert!(matches!(err, StoreError::Overlap { .. }));

        let cancel = BookingPatch {
            status: Some(BookingStatus::Canceled),
            ..Default::default()
        };
        BookingStore::update(&store, second.id, &cancel).await.unwrap();

        let extended = BookingStore::update(&store, first.id, &extend).await.unwrap();
        assert_eq!(extended.check_out, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    }

    #[tokio::test]
    async fn test_create_with_payment_is_atomic() {
        let (store, room) = store_with_room();
        let booking = draft(room, "2024-03-01", "2024-03-03");
        let payment = PaymentDraft::opening(booking.total_amount, now());

        let (created, paid) = store
            .create_with_payment(&booking, &payment)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(paid.booking_id, created.id);
        assert_eq!(paid.amount, dec!(300));

        let clash = store.create_with_payment(&booking, &payment).await;
        assert!(matches!(clash, Err(StoreError::Overlap { .. })));

        let payments: i64 = store
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM payments", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(payments, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_book_the_room_once() {
        for _ in 0..20 {
            let (store, room) = store_with_room();
            let (a, b) = (store.clone(), store.clone());

            let first = tokio::spawn(async move {
                BookingStore::create(&a, &draft(room, "2024-05-01", "2024-05-04")).await
            });
            let second = tokio::spawn(async move {
                BookingStore::create(&b, &draft(room, "2024-05-03", "2024-05-06")).await
            });
            let results = [first.await.unwrap(), second.await.unwrap()];

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            assert_eq!(
                results
                    .iter()
                    .filter(|r| matches!(r, Err(StoreError::Overlap { .. })))
                    .count(),
                1
            );
            let page = BookingStore::list(&store, 0, 10).await.unwrap();
            assert_eq!(page.total, 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_with_payment_and_create_book_the_room_once() {
        for _ in 0..20 {
            let (store, room) = store_with_room();
            let (a, b) = (store.clone(), store.clone());

            let with_payment = tokio::spawn(async move {
                let booking = draft(room, "2024-05-01", "2024-05-04");
                let payment = PaymentDraft::opening(booking.total_amount, now());
                a.create_with_payment(&booking, &payment)
                    .await
                    .map(|created| created.map(|(booking, _)| booking))
            });
            let plain = tokio::spawn(async move {
                BookingStore::create(&b, &draft(room, "2024-05-02", "2024-05-03"))
                    .await
                    .map(Some)
            });
            let results = [with_payment.await.unwrap(), plain.await.unwrap()];

            assert_eq!(results.iter().filter(|r| matches!(r, Ok(Some(_)))).count(), 1);
            assert_eq!(
                results
                    .iter()
                    .filter(|r| matches!(r, Err(StoreError::Overlap { .. })))
                    .count(),
                1
            );
            let page = BookingStore::list(&store, 0, 10).await.unwrap();
            assert_eq!(page.total, 1);
        }
    }

    #[tokio::test]
    async fn test_update_rechecks_transition_against_stored_status() {
        let (store, room) = store_with_room();
        let booking = BookingStore::create(&store, &draft(room, "2024-01-01", "2024-01-05"))
            .await
            .unwrap();

        let cancel = BookingPatch {
            status: Some(BookingStatus::Canceled),
            ..Default::default()
        };
        BookingStore::update(&store, booking.id, &cancel).await.unwrap();

        let reconfirm = BookingPatch {
            status: Some(BookingStatus::Confirmed),
            ..Default::default()
        };
        let err = BookingStore::update(&store, booking.id, &reconfirm)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidTransition {
                from: BookingStatus::Canceled,
                to: BookingStatus::Confirmed
            }
        ));

        let stored = BookingStore::get_by_id(&store, booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Canceled);

        // Repeating the stored status is not a transition.
        BookingStore::update(&store, booking.id, &cancel).await.unwrap();
    }

    #[tokio::test]
    async fn test_finalize_payment_once() {
        let (store, room) = store_with_room();
        let booking = draft(room, "2024-03-01", "2024-03-03");
        let opening = PaymentDraft::opening(booking.total_amount, now());
        let (_, payment) = store
            .create_with_payment(&booking, &opening)
            .await
            .unwrap()
            .unwrap();

        let paid = store.finalize(payment.id, PaymentMethod::BankTransfer).await.unwrap();
        assert_eq!(paid.status, PaymentStatus::Completed);
        assert_eq!(paid.method, PaymentMethod::BankTransfer);

        assert!(matches!(
            store.finalize(payment.id, PaymentMethod::Cash).await,
            Err(StoreError::PaymentNotPending {
                status: PaymentStatus::Completed,
                ..
            })
        ));
        assert!(matches!(
            store.finalize(999, PaymentMethod::Cash).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let (store, _) = store_with_room();
        assert!(matches!(
            BookingStore::delete(&store, 42).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            BookingStore::update(&store, 42, &BookingPatch::default()).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            SummaryStore::delete(&store, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).await,
            Err(StoreError::NotFound)
        ));
        assert!(store.ping().is_ok());
    }
}
