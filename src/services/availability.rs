use std::collections::HashSet;

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::models::Schedule;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Slot {
    pub time: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaySlots {
    Open(Vec<Slot>),
    Closed { message: String },
}

/// Lays the schedule's hourly grid over the slots already taken on `date`.
pub fn available_slots(
    conn: &Connection,
    schedule: &Schedule,
    date: &NaiveDate,
) -> anyhow::Result<DaySlots> {
    if schedule.is_closed(*date) {
        return Ok(DaySlots::Closed {
            message: format!("Closed on {}", schedule.closed_days_label()),
        });
    }

    let taken = queries::get_taken_times(conn, date)?;
    Ok(DaySlots::Open(mark_taken(schedule.hourly_grid(), &taken)))
}

fn mark_taken(grid: Vec<String>, taken: &[String]) -> Vec<Slot> {
    let taken: HashSet<&str> = taken.iter().map(String::as_str).collect();
    grid.into_iter()
        .map(|time| {
            let available = !taken.contains(time.as_str());
            Slot { time, available }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Weekday};

    use crate::db;
    use crate::models::{Booking, BookingStatus};

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn insert(conn: &Connection, id: &str, day: &str, time: &str, status: BookingStatus) {
        let now = NaiveDateTime::parse_from_str("2024-06-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let booking = Booking {
            id: id.to_string(),
            date: date(day),
            time: time.to_string(),
            client_name: "Bob".to_string(),
            client_phone: "+15552220000".to_string(),
            client_email: None,
            service: "Beard Trim".to_string(),
            status,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        assert!(queries::insert_booking(conn, &booking).unwrap());
    }

    #[test]
    fn test_closed_day_has_no_slots() {
        let conn = setup_db();
        // 2024-06-09 is a Sunday
        let result = available_slots(&conn, &Schedule::default(), &date("2024-06-09")).unwrap();
        assert_eq!(
            result,
            DaySlots::Closed {
                message: "Closed on Sundays".to_string()
            }
        );
    }

    #[test]
    fn test_empty_day_fully_available() {
        let conn = setup_db();
        let result = available_slots(&conn, &Schedule::default(), &date("2024-06-10")).unwrap();
        let DaySlots::Open(slots) = result else {
            panic!("expected open day");
        };

        let times: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(
            times,
            vec!["08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00"]
        );
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn test_pending_and_approved_take_slots() {
        let conn = setup_db();
        insert(&conn, "b-1", "2024-06-10", "09:00", BookingStatus::Pending);
        insert(&conn, "b-2", "2024-06-10", "11:00", BookingStatus::Approved);
        insert(&conn, "b-3", "2024-06-10", "13:00", BookingStatus::Rejected);
        insert(&conn, "b-4", "2024-06-11", "10:00", BookingStatus::Pending);

        let DaySlots::Open(slots) =
            available_slots(&conn, &Schedule::default(), &date("2024-06-10")).unwrap()
        else {
            panic!("expected open day");
        };

        let unavailable: Vec<&str> = slots
            .iter()
            .filter(|s| !s.available)
            .map(|s| s.time.as_str())
            .collect();
        assert_eq!(unavailable, vec!["09:00", "11:00"]);
    }

    #[test]
    fn test_custom_schedule() {
        let conn = setup_db();
        let schedule = Schedule {
            opening_hour: 10,
            closing_hour: 13,
            closed_days: vec![Weekday::Mon],
            ..Schedule::default()
        };

        // Monday closed under this schedule, Sunday open
        assert!(matches!(
            available_slots(&conn, &schedule, &date("2024-06-10")).unwrap(),
            DaySlots::Closed { .. }
        ));
        let DaySlots::Open(slots) = available_slots(&conn, &schedule, &date("2024-06-09")).unwrap()
        else {
            panic!("expected open day");
        };
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].time, "10:00");
    }

    #[test]
    fn test_mark_taken_ignores_off_grid_times() {
        let grid = vec!["08:00".to_string(), "09:00".to_string()];
        let slots = mark_taken(grid, &["07:00".to_string(), "09:00".to_string()]);
        assert_eq!(
            slots,
            vec![
                Slot { time: "08:00".to_string(), available: true },
                Slot { time: "09:00".to_string(), available: false },
            ]
        );
    }
}
