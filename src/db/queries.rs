use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::models::{
    AuditEntry, Booking, BookingDetail, BookingDraft, BookingFilter, BookingPatch, BookingStatus,
    DailyBookingSummary, Page, Payment, PaymentDraft, PaymentMethod, PaymentOverview,
    PaymentStatus, RoomStatus, RoomWithType, Stay, SummaryStatus, SummaryTally,
};
use crate::store::StoreError;

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TS_FMT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLUMNS: &str = "id, customer_id, rate_price_id, room_id, room_type_id, \
     check_in_date, check_out_date, status, total_amount, created_at, updated_at";

const PAYMENT_COLUMNS: &str =
    "id, booking_id, amount, payment_method, payment_date, status, created_at, updated_at";

const DETAIL_SELECT: &str = "SELECT b.id, b.customer_id, b.rate_price_id, b.room_id, b.room_type_id,
        b.check_in_date, b.check_out_date, b.status, b.total_amount, b.created_at, b.updated_at,
        r.room_number, rt.name,
        p.id, p.amount, p.payment_method, p.status, p.updated_at
 FROM bookings b
 JOIN rooms r ON r.id = b.room_id
 LEFT JOIN room_types rt ON rt.id = b.room_type_id
 LEFT JOIN payments p ON p.id = (SELECT MAX(id) FROM payments WHERE booking_id = b.id)";

const SUMMARY_COLUMNS: &str = "summary_date, total_bookings, pending_bookings, \
     confirmed_bookings, checked_in_bookings, checked_out_bookings, canceled_bookings, \
     completed_bookings, total_amount, booking_ids, status, created_at, updated_at";

// ── Bookings ──

pub fn insert_booking(
    conn: &Connection,
    draft: &BookingDraft,
    now: NaiveDateTime,
) -> Result<Booking, StoreError> {
    let now = format_ts(&now);
    conn.execute(
        "INSERT INTO bookings (customer_id, rate_price_id, room_id, room_type_id, check_in_date, check_out_date, status, total_amount, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
        params![
            draft.customer_id,
            draft.rate_price_id,
            draft.room_id,
            draft.room_type_id,
            format_date(&draft.check_in),
            format_date(&draft.check_out),
            draft.status.code(),
            format_amount(&draft.total_amount),
            now,
        ],
    )?;

    get_booking_by_id(conn, conn.last_insert_rowid())?.ok_or(StoreError::NotFound)
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> Result<Option<Booking>, StoreError> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Page of bookings matching `filter`, newest id first, with the unpaged count.
pub fn list_bookings(
    conn: &Connection,
    filter: &BookingFilter,
    skip: u64,
    limit: u64,
) -> Result<Page<Booking>, StoreError> {
    let (conditions, params_vec) = booking_conditions(filter);
    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let mut params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM bookings{where_clause}"),
        params_refs.as_slice(),
        |row| row.get(0),
    )?;

    let limit = to_sql_int(limit);
    let offset = to_sql_int(skip);
    params_refs.push(&limit);
    params_refs.push(&offset);

    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings{where_clause} ORDER BY id DESC LIMIT ? OFFSET ?"
    ))?;
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }

    Ok(Page {
        items: bookings,
        total: total as u64,
    })
}

fn booking_conditions(filter: &BookingFilter) -> (Vec<&'static str>, Vec<Box<dyn ToSql>>) {
    let mut conditions = vec![];
    let mut values: Vec<Box<dyn ToSql>> = vec![];

    if let Some(id) = filter.id {
        conditions.push("id = ?");
        values.push(Box::new(id));
    }
    if let Some(customer_id) = filter.customer_id {
        conditions.push("customer_id = ?");
        values.push(Box::new(customer_id));
    }
    if let Some(rate_price_id) = filter.rate_price_id {
        conditions.push("rate_price_id = ?");
        values.push(Box::new(rate_price_id));
    }
    if let Some(room_id) = filter.room_id {
        conditions.push("room_id = ?");
        values.push(Box::new(room_id));
    }
    if let Some(room_type_id) = filter.room_type_id {
        conditions.push("room_type_id = ?");
        values.push(Box::new(room_type_id));
    }
    if let Some(check_in) = &filter.check_in {
        conditions.push("check_in_date = ?");
        values.push(Box::new(format_date(check_in)));
    }
    if let Some(check_out) = &filter.check_out {
        conditions.push("check_out_date = ?");
        values.push(Box::new(format_date(check_out)));
    }
    if let Some(status) = filter.status {
        conditions.push("status = ?");
        values.push(Box::new(status.code()));
    }
    if let Some(amount) = &filter.total_amount {
        conditions.push("total_amount = ?");
        values.push(Box::new(format_amount(amount)));
    }
    if let Some(day) = &filter.created_on {
        conditions.push("date(created_at) = ?");
        values.push(Box::new(format_date(day)));
    }
    if let Some(day) = &filter.updated_on {
        conditions.push("date(updated_at) = ?");
        values.push(Box::new(format_date(day)));
    }
    if let Some(day) = &filter.touched_on {
        conditions.push("(date(created_at) = ? OR date(updated_at) = ?)");
        values.push(Box::new(format_date(day)));
        values.push(Box::new(format_date(day)));
    }

    (conditions, values)
}

/// Fails with `Overlap` when an active booking on `room_id` shares a night
/// with `stay`. `exclude_id` skips the booking being rewritten.
pub fn ensure_room_free(
    conn: &Connection,
    room_id: i64,
    stay: &Stay,
    exclude_id: Option<i64>,
) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE room_id = ?1 AND status NOT IN (?2, ?3) AND (?4 IS NULL OR id != ?4)"
    ))?;

    let [inactive_a, inactive_b] = BookingStatus::INACTIVE;
    let rows = stmt.query_map(
        params![room_id, inactive_a.code(), inactive_b.code(), exclude_id],
        |row| Ok(parse_booking_row(row)),
    )?;

    for row in rows {
        let existing = row??;
        if existing.stay().overlaps(stay) {
            tracing::debug!(
                room_id,
                conflicting_booking = existing.id,
                "stay overlaps an active booking"
            );
            return Err(StoreError::Overlap {
                room_id,
                stay: *stay,
            });
        }
    }

    Ok(())
}

pub fn update_booking(
    conn: &Connection,
    id: i64,
    patch: &BookingPatch,
    now: NaiveDateTime,
) -> Result<bool, StoreError> {
    let count = conn.execute(
        "UPDATE bookings SET
           customer_id = COALESCE(?1, customer_id),
           rate_price_id = COALESCE(?2, rate_price_id),
           room_id = COALESCE(?3, room_id),
           room_type_id = COALESCE(?4, room_type_id),
           check_in_date = COALESCE(?5, check_in_date),
           check_out_date = COALESCE(?6, check_out_date),
           status = COALESCE(?7, status),
           total_amount = COALESCE(?8, total_amount),
           updated_at = ?9
         WHERE id = ?10",
        params![
            patch.customer_id,
            patch.rate_price_id,
            patch.room_id,
            patch.room_type_id,
            patch.check_in.as_ref().map(format_date),
            patch.check_out.as_ref().map(format_date),
            patch.status.map(|s| s.code()),
            patch.total_amount.as_ref().map(format_amount),
            format_ts(&now),
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn get_booking_detail(conn: &Connection, id: i64) -> Result<Option<BookingDetail>, StoreError> {
    let result = conn.query_row(
        &format!("{DETAIL_SELECT} WHERE b.id = ?1"),
        params![id],
        |row| Ok(parse_detail_row(row)),
    );

    match result {
        Ok(detail) => Ok(Some(detail?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Bookings joined with room, room type and latest payment, newest first.
pub fn list_booking_details(
    conn: &Connection,
    skip: u64,
    limit: u64,
) -> Result<Page<BookingDetail>, StoreError> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings b JOIN rooms r ON r.id = b.room_id",
        [],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(&format!(
        "{DETAIL_SELECT} ORDER BY b.id DESC LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt.query_map(params![to_sql_int(limit), to_sql_int(skip)], |row| {
        Ok(parse_detail_row(row))
    })?;

    let mut details = vec![];
    for row in rows {
        details.push(row??);
    }

    Ok(Page {
        items: details,
        total: total as u64,
    })
}

fn parse_booking_row(row: &rusqlite::Row) -> Result<Booking, StoreError> {
    let status_code: i64 = row.get(7)?;
    let amount: String = row.get(8)?;
    let check_in: String = row.get(5)?;
    let check_out: String = row.get(6)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    Ok(Booking {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        rate_price_id: row.get(2)?,
        room_id: row.get(3)?,
        room_type_id: row.get(4)?,
        check_in: parse_date(&check_in)?,
        check_out: parse_date(&check_out)?,
        status: BookingStatus::from_code(status_code)
            .ok_or_else(|| StoreError::CorruptRow(format!("booking status {status_code}")))?,
        total_amount: parse_amount(&amount)?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

fn parse_detail_row(row: &rusqlite::Row) -> Result<BookingDetail, StoreError> {
    let booking = parse_booking_row(row)?;
    let room_number: String = row.get(11)?;
    let room_type_name: Option<String> = row.get(12)?;

    let payment_id: Option<i64> = row.get(13)?;
    let payment = match payment_id {
        Some(id) => {
            let amount: String = row.get(14)?;
            let method: i64 = row.get(15)?;
            let status: i64 = row.get(16)?;
            let updated_at: String = row.get(17)?;
            Some(PaymentOverview {
                id,
                amount: parse_amount(&amount)?,
                method: PaymentMethod::from_code(method)
                    .ok_or_else(|| StoreError::CorruptRow(format!("payment method {method}")))?,
                status: PaymentStatus::from_code(status)
                    .ok_or_else(|| StoreError::CorruptRow(format!("payment status {status}")))?,
                updated_at: parse_ts(&updated_at)?,
            })
        }
        None => None,
    };

    Ok(BookingDetail {
        booking,
        room_number,
        room_type_name,
        payment,
    })
}

// ── Payments ──

pub fn insert_payment(
    conn: &Connection,
    booking_id: i64,
    draft: &PaymentDraft,
    now: NaiveDateTime,
) -> Result<Payment, StoreError> {
    let now = format_ts(&now);
    conn.execute(
        "INSERT INTO payments (booking_id, amount, payment_method, payment_date, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            booking_id,
            format_amount(&draft.amount),
            draft.method.code(),
            format_ts(&draft.payment_date),
            draft.status.code(),
            now,
        ],
    )?;

    get_payment_by_id(conn, conn.last_insert_rowid())?.ok_or(StoreError::NotFound)
}

pub fn get_payment_by_id(conn: &Connection, id: i64) -> Result<Option<Payment>, StoreError> {
    conn.query_row(
        &format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?1"),
        params![id],
        |row| Ok(parse_payment_row(row)),
    )
    .optional()?
    .transpose()
}

/// Completes a pending payment. Returns false when no pending row matched.
pub fn finalize_payment(
    conn: &Connection,
    id: i64,
    method: PaymentMethod,
    now: NaiveDateTime,
) -> Result<bool, StoreError> {
    let now = format_ts(&now);
    let count = conn.execute(
        "UPDATE payments SET payment_method = ?2, status = ?3, payment_date = ?4, updated_at = ?4
         WHERE id = ?1 AND status = ?5",
        params![
            id,
            method.code(),
            PaymentStatus::Completed.code(),
            now,
            PaymentStatus::Pending.code(),
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_payment(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    let count = conn.execute("DELETE FROM payments WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn list_payments_for_booking(
    conn: &Connection,
    booking_id: i64,
) -> Result<Vec<Payment>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE booking_id = ?1 ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map(params![booking_id], |row| Ok(parse_payment_row(row)))?;

    let mut payments = vec![];
    for row in rows {
        payments.push(row??);
    }
    Ok(payments)
}

fn parse_payment_row(row: &rusqlite::Row) -> Result<Payment, StoreError> {
    let amount: String = row.get(2)?;
    let method: i64 = row.get(3)?;
    let payment_date: String = row.get(4)?;
    let status: i64 = row.get(5)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Payment {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        amount: parse_amount(&amount)?,
        method: PaymentMethod::from_code(method)
            .ok_or_else(|| StoreError::CorruptRow(format!("payment method {method}")))?,
        payment_date: parse_ts(&payment_date)?,
        status: PaymentStatus::from_code(status)
            .ok_or_else(|| StoreError::CorruptRow(format!("payment status {status}")))?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

// ── Rooms ──

pub fn insert_room_type(conn: &Connection, name: &str) -> Result<i64, StoreError> {
    conn.execute("INSERT INTO room_types (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_room(
    conn: &Connection,
    room_number: &str,
    type_id: i64,
    status: RoomStatus,
    floor: i64,
) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO rooms (room_number, type_id, status, floor) VALUES (?1, ?2, ?3, ?4)",
        params![room_number, type_id, status.code(), floor],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn available_rooms(conn: &Connection, stay: &Stay) -> Result<Vec<RoomWithType>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.room_number, r.type_id, rt.name, r.description, r.status, r.floor, r.created_at, r.updated_at
         FROM rooms r
         JOIN room_types rt ON r.type_id = rt.id
         WHERE r.status = ?1
           AND NOT EXISTS (
               SELECT 1 FROM bookings b
               WHERE b.room_id = r.id
                 AND b.status NOT IN (?2, ?3)
                 AND b.check_in_date < ?5
                 AND b.check_out_date > ?4
           )
         ORDER BY r.id",
    )?;

    let [inactive_a, inactive_b] = BookingStatus::INACTIVE;
    let rows = stmt.query_map(
        params![
            RoomStatus::Available.code(),
            inactive_a.code(),
            inactive_b.code(),
            format_date(&stay.check_in),
            format_date(&stay.check_out),
        ],
        |row| Ok(parse_room_row(row)),
    )?;

    let mut rooms = vec![];
    for row in rows {
        rooms.push(row??);
    }
    Ok(rooms)
}

pub fn list_rooms_with_type(
    conn: &Connection,
    skip: u64,
    limit: u64,
) -> Result<Page<RoomWithType>, StoreError> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM rooms r JOIN room_types rt ON r.type_id = rt.id",
        [],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT r.id, r.room_number, r.type_id, rt.name, r.description, r.status, r.floor, r.created_at, r.updated_at
         FROM rooms r
         JOIN room_types rt ON r.type_id = rt.id
         ORDER BY r.id
         LIMIT ?1 OFFSET ?2",
    )?;
    let rows = stmt.query_map(params![to_sql_int(limit), to_sql_int(skip)], |row| {
        Ok(parse_room_row(row))
    })?;

    let mut rooms = vec![];
    for row in rows {
        rooms.push(row??);
    }

    Ok(Page {
        items: rooms,
        total: total as u64,
    })
}

fn parse_room_row(row: &rusqlite::Row) -> Result<RoomWithType, StoreError> {
    let status: i64 = row.get(5)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(RoomWithType {
        id: row.get(0)?,
        room_number: row.get(1)?,
        type_id: row.get(2)?,
        type_name: row.get(3)?,
        description: row.get(4)?,
        status: RoomStatus::from_code(status)
            .ok_or_else(|| StoreError::CorruptRow(format!("room status {status}")))?,
        floor: row.get(6)?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

// ── Daily Summaries ──

pub fn upsert_summary(
    conn: &Connection,
    date: NaiveDate,
    tally: &SummaryTally,
    status: SummaryStatus,
    now: NaiveDateTime,
) -> Result<DailyBookingSummary, StoreError> {
    conn.execute(
        "INSERT INTO daily_booking_summary (summary_date, total_bookings, pending_bookings, confirmed_bookings,
             checked_in_bookings, checked_out_bookings, canceled_bookings, completed_bookings,
             total_amount, booking_ids, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
         ON CONFLICT(summary_date) DO UPDATE SET
           total_bookings = excluded.total_bookings,
           pending_bookings = excluded.pending_bookings,
           confirmed_bookings = excluded.confirmed_bookings,
           checked_in_bookings = excluded.checked_in_bookings,
           checked_out_bookings = excluded.checked_out_bookings,
           canceled_bookings = excluded.canceled_bookings,
           completed_bookings = excluded.completed_bookings,
           total_amount = excluded.total_amount,
           booking_ids = excluded.booking_ids,
           status = excluded.status,
           updated_at = excluded.updated_at",
        params![
            format_date(&date),
            tally.total_bookings,
            tally.pending_bookings,
            tally.confirmed_bookings,
            tally.checked_in_bookings,
            tally.checked_out_bookings,
            tally.canceled_bookings,
            tally.completed_bookings,
            format_amount(&tally.total_amount),
            join_ids(&tally.booking_ids),
            status.code(),
            format_ts(&now),
        ],
    )?;

    get_summary(conn, date)?.ok_or(StoreError::NotFound)
}

pub fn get_summary(
    conn: &Connection,
    date: NaiveDate,
) -> Result<Option<DailyBookingSummary>, StoreError> {
    conn.query_row(
        &format!("SELECT {SUMMARY_COLUMNS} FROM daily_booking_summary WHERE summary_date = ?1"),
        params![format_date(&date)],
        |row| Ok(parse_summary_row(row)),
    )
    .optional()?
    .transpose()
}

pub fn list_summaries(
    conn: &Connection,
    skip: u64,
    limit: u64,
) -> Result<Page<DailyBookingSummary>, StoreError> {
    let total: i64 =
        conn.query_row("SELECT COUNT(*) FROM daily_booking_summary", [], |row| row.get(0))?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM daily_booking_summary ORDER BY summary_date DESC LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt.query_map(params![to_sql_int(limit), to_sql_int(skip)], |row| {
        Ok(parse_summary_row(row))
    })?;

    let mut summaries = vec![];
    for row in rows {
        summaries.push(row??);
    }

    Ok(Page {
        items: summaries,
        total: total as u64,
    })
}

pub fn update_summary_status(
    conn: &Connection,
    date: NaiveDate,
    status: SummaryStatus,
    now: NaiveDateTime,
) -> Result<bool, StoreError> {
    let count = conn.execute(
        "UPDATE daily_booking_summary SET status = ?2, updated_at = ?3 WHERE summary_date = ?1",
        params![format_date(&date), status.code(), format_ts(&now)],
    )?;
    Ok(count > 0)
}

pub fn delete_summary(conn: &Connection, date: NaiveDate) -> Result<bool, StoreError> {
    let count = conn.execute(
        "DELETE FROM daily_booking_summary WHERE summary_date = ?1",
        params![format_date(&date)],
    )?;
    Ok(count > 0)
}

fn parse_summary_row(row: &rusqlite::Row) -> Result<DailyBookingSummary, StoreError> {
    let summary_date: String = row.get(0)?;
    let total_amount: String = row.get(8)?;
    let booking_ids: String = row.get(9)?;
    let status: i64 = row.get(10)?;
    let created_at: String = row.get(11)?;
    let updated_at: String = row.get(12)?;

    Ok(DailyBookingSummary {
        summary_date: parse_date(&summary_date)?,
        tally: SummaryTally {
            total_bookings: row.get(1)?,
            pending_bookings: row.get(2)?,
            confirmed_bookings: row.get(3)?,
            checked_in_bookings: row.get(4)?,
            checked_out_bookings: row.get(5)?,
            canceled_bookings: row.get(6)?,
            completed_bookings: row.get(7)?,
            total_amount: parse_amount(&total_amount)?,
            booking_ids: split_ids(&booking_ids)?,
        },
        status: SummaryStatus::from_code(status)
            .ok_or_else(|| StoreError::CorruptRow(format!("summary status {status}")))?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

// ── Audit Log ──

pub fn insert_log(conn: &Connection, entry: &AuditEntry) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO logs (table_name, record_id, action, user_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.table_name,
            entry.record_id,
            entry.action.as_str(),
            entry.actor_id,
            format_ts(&entry.created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Formatting ──

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

pub fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(TS_FMT).to_string()
}

// Amounts are stored normalized so equality filters compare text reliably.
fn format_amount(amount: &Decimal) -> String {
    amount.normalize().to_string()
}

fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| StoreError::CorruptRow(format!("date {s:?}: {e}")))
}

fn parse_ts(s: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(s, TS_FMT)
        .map_err(|e| StoreError::CorruptRow(format!("timestamp {s:?}: {e}")))
}

fn parse_amount(s: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(s).map_err(|e| StoreError::CorruptRow(format!("amount {s:?}: {e}")))
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

fn split_ids(s: &str) -> Result<Vec<i64>, StoreError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| StoreError::CorruptRow(format!("booking id list {s:?}")))
        })
        .collect()
}

fn to_sql_int(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
