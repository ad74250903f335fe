use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLUMNS: &str = "id, date, time, client_name, client_phone, client_email, service, status, notes, created_at, updated_at";

// ── Bookings ──

/// Inserts a booking. Returns `false` without writing when a pending or
/// approved booking already holds the same date and time.
pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<bool> {
    let date = booking.date.format(DATE_FORMAT).to_string();
    let created_at = booking.created_at.format(TIMESTAMP_FORMAT).to_string();
    let updated_at = booking.updated_at.format(TIMESTAMP_FORMAT).to_string();

    let result = conn.execute(
        "INSERT INTO bookings (id, date, time, client_name, client_phone, client_email, service, status, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.id,
            date,
            booking.time,
            booking.client_name,
            booking.client_phone,
            booking.client_email,
            booking.service,
            booking.status.as_str(),
            booking.notes,
            created_at,
            updated_at,
        ],
    );

    match result {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Ok(false)
        }
        Err(e) => Err(e).context("failed to insert booking"),
    }
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
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

/// Every booking on `date`, whatever its status, earliest first.
pub fn get_bookings_for_date(conn: &Connection, date: &NaiveDate) -> anyhow::Result<Vec<Booking>> {
    list_bookings(
        conn,
        &BookingFilter {
            from: Some(*date),
            to: Some(*date),
            ..BookingFilter::default()
        },
    )
}

/// Pending and approved bookings between `start` and `end` inclusive.
pub fn get_active_bookings_in_range(
    conn: &Connection,
    start: &NaiveDate,
    end: &NaiveDate,
) -> anyhow::Result<Vec<Booking>> {
    let start_str = start.format(DATE_FORMAT).to_string();
    let end_str = end.format(DATE_FORMAT).to_string();

    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE date >= ?1 AND date <= ?2 AND status IN ('pending', 'approved')
         ORDER BY date ASC, time ASC"
    ))?;

    let rows = stmt.query_map(params![start_str, end_str], |row| {
        Ok(parse_booking_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Times on `date` held by a pending or approved booking.
pub fn get_taken_times(conn: &Connection, date: &NaiveDate) -> anyhow::Result<Vec<String>> {
    let date_str = date.format(DATE_FORMAT).to_string();
    let mut stmt = conn.prepare(
        "SELECT time FROM bookings
         WHERE date = ?1 AND status IN ('pending', 'approved')
         ORDER BY time ASC",
    )?;

    let rows = stmt.query_map(params![date_str], |row| row.get::<_, String>(0))?;

    let mut times = vec![];
    for row in rows {
        times.push(row?);
    }
    Ok(times)
}

#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub fn list_bookings(conn: &Connection, filter: &BookingFilter) -> anyhow::Result<Vec<Booking>> {
    let mut clauses: Vec<String> = vec![];
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(status) = filter.status {
        params_vec.push(Box::new(status.as_str()));
        clauses.push(format!("status = ?{}", params_vec.len()));
    }
    if let Some(from) = filter.from {
        params_vec.push(Box::new(from.format(DATE_FORMAT).to_string()));
        clauses.push(format!("date >= ?{}", params_vec.len()));
    }
    if let Some(to) = filter.to {
        params_vec.push(Box::new(to.format(DATE_FORMAT).to_string()));
        clauses.push(format!("date <= ?{}", params_vec.len()));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings {where_clause} ORDER BY date ASC, time ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Moves a pending booking to `status`. Returns `false` when no pending
/// booking with that id exists.
pub fn decide_booking(conn: &Connection, id: &str, status: BookingStatus) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = 'pending'",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let date_str: String = row.get(1)?;
    let time: String = row.get(2)?;
    let client_name: String = row.get(3)?;
    let client_phone: String = row.get(4)?;
    let client_email: Option<String> = row.get(5)?;
    let service: String = row.get(6)?;
    let status_str: String = row.get(7)?;
    let notes: Option<String> = row.get(8)?;
    let created_at_str: String = row.get(9)?;
    let updated_at_str: String = row.get(10)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .with_context(|| format!("bad date on booking {id}: {date_str}"))?;
    let status = BookingStatus::parse(&status_str)
        .with_context(|| format!("bad status on booking {id}: {status_str}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
        .with_context(|| format!("bad created_at on booking {id}"))?;
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, TIMESTAMP_FORMAT)
        .with_context(|| format!("bad updated_at on booking {id}"))?;

    Ok(Booking {
        id,
        date,
        time,
        client_name,
        client_phone,
        client_email,
        service,
        status,
        notes,
        created_at,
        updated_at,
    })
}
