use anyhow::Context;
use chrono::{Duration, NaiveTime};

use crate::models::Booking;

pub const DEFAULT_DURATION_MINUTES: u32 = 60;

pub fn generate_ics(
    booking: &Booking,
    business_name: &str,
    duration_minutes: u32,
) -> anyhow::Result<String> {
    let start_time = NaiveTime::parse_from_str(&booking.time, "%H:%M")
        .with_context(|| format!("bad time on booking {}: {}", booking.id, booking.time))?;
    let start = booking.date.and_time(start_time);
    let end = start + Duration::minutes(i64::from(duration_minutes));

    let dtstart = start.format("%Y%m%dT%H%M%S");
    let dtend = end.format("%Y%m%dT%H%M%S");
    let dtstamp = booking.updated_at.format("%Y%m%dT%H%M%S");
    let uid = format!("{}@barberbook", booking.id);

    let summary = fold_line(&format!(
        "SUMMARY:{}",
        escape_text(&format!("{} at {}", booking.service, business_name))
    ));
    let description = fold_line(&format!(
        "DESCRIPTION:{}",
        escape_text(booking.notes.as_deref().unwrap_or("No additional notes"))
    ));

    Ok(format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Barberbook//Appointments//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         {summary}\r\n\
         {description}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    ))
}

/// Escapes a TEXT value so it cannot end its content line or add properties.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Folds a content line at 75 octets, never splitting a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    const LIMIT: usize = 75;

    let mut out = String::with_capacity(line.len() + line.len() / LIMIT * 3);
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > LIMIT {
            out.push_str("\r\n ");
            // the leading space counts toward the continuation line
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out
}
