use chrono::{NaiveDate, SubsecRound, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Schedule};

pub const DEFAULT_SERVICE: &str = "Haircut";

/// A booking request as submitted by the public form. Every field is
/// optional at this level so missing values surface as a validation error
/// rather than a body rejection.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub date: Option<String>,
    pub time: Option<String>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
    pub service: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Name, phone, and time slot are required")]
    MissingFields,

    #[error("Invalid date, expected YYYY-MM-DD")]
    InvalidDate,

    #[error("Invalid time, bookings start on the hour (HH:00)")]
    InvalidTime,

    #[error("We are closed on {days}. Please choose another day.")]
    Closed { days: String },

    #[error("Business hours are {hours}")]
    OutsideBusinessHours { hours: String },

    #[error("This time slot is already booked. Please choose another.")]
    SlotTaken,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        let message = e.to_string();
        match e {
            BookingError::SlotTaken => AppError::conflict(message),
            BookingError::Store(inner) => AppError::Internal(inner),
            _ => AppError::validation(message),
        }
    }
}

/// Date and hour that passed every check that does not need the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedSlot {
    pub date: NaiveDate,
    pub time: String,
}

pub fn validate_request(schedule: &Schedule, req: &NewBooking) -> Result<RequestedSlot, BookingError> {
    let (Some(date), Some(time), Some(_), Some(_)) = (
        present(&req.date),
        present(&req.time),
        present(&req.client_name),
        present(&req.client_phone),
    ) else {
        return Err(BookingError::MissingFields);
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| BookingError::InvalidDate)?;
    let (hour, minute) = time.split_once(':').unwrap_or((time, ""));
    let hour: u32 = hour.trim().parse().map_err(|_| BookingError::InvalidTime)?;

    if schedule.is_closed(date) {
        return Err(BookingError::Closed {
            days: schedule.closed_days_label(),
        });
    }

    if !schedule.is_open_hour(hour) {
        return Err(BookingError::OutsideBusinessHours {
            hours: schedule.business_hours_label(),
        });
    }

    if minute.trim().parse::<u32>() != Ok(0) {
        return Err(BookingError::InvalidTime);
    }

    Ok(RequestedSlot {
        date,
        time: format!("{hour:02}:00"),
    })
}

/// Validates the request and stores it as a pending booking. The slot check
/// is the insert itself: the store refuses a second live booking for the
/// same date and time, so two racing requests cannot both win.
pub fn create_booking(
    conn: &Connection,
    schedule: &Schedule,
    req: NewBooking,
) -> Result<Booking, BookingError> {
    let slot = validate_request(schedule, &req)?;
    let now = Utc::now().naive_utc().trunc_subsecs(0);

    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        date: slot.date,
        time: slot.time,
        client_name: owned(&req.client_name).unwrap_or_default(),
        client_phone: owned(&req.client_phone).unwrap_or_default(),
        client_email: owned(&req.client_email),
        service: owned(&req.service).unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
        status: BookingStatus::Pending,
        notes: owned(&req.notes),
        created_at: now,
        updated_at: now,
    };

    if !queries::insert_booking(conn, &booking)? {
        tracing::info!(date = %booking.date, time = %booking.time, "slot already taken");
        return Err(BookingError::SlotTaken);
    }

    tracing::info!(
        booking_id = %booking.id,
        date = %booking.date,
        time = %booking.time,
        service = %booking.service,
        "booking request created"
    );

    Ok(booking)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn owned(value: &Option<String>) -> Option<String> {
    present(value).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn request(date: &str, time: &str) -> NewBooking {
        NewBooking {
            date: Some(date.to_string()),
            time: Some(time.to_string()),
            client_name: Some("A".to_string()),
            client_phone: Some("1".to_string()),
            ..NewBooking::default()
        }
    }

    #[test]
    fn test_missing_fields() {
        let schedule = Schedule::default();
        let mut req = request("2024-06-10", "09:00");
        req.client_phone = Some("   ".to_string());
        assert!(matches!(
            validate_request(&schedule, &req),
            Err(BookingError::MissingFields)
        ));

        assert!(matches!(
            validate_request(&schedule, &NewBooking::default()),
            Err(BookingError::MissingFields)
        ));
    }

    #[test]
    fn test_malformed_date_and_time() {
        let schedule = Schedule::default();
        assert!(matches!(
            validate_request(&schedule, &request("10/06/2024", "09:00")),
            Err(BookingError::InvalidDate)
        ));
        assert!(matches!(
            validate_request(&schedule, &request("2024-06-10", "nine")),
            Err(BookingError::InvalidTime)
        ));
        assert!(matches!(
            validate_request(&schedule, &request("2024-06-10", "09:30")),
            Err(BookingError::InvalidTime)
        ));
    }

    #[test]
    fn test_closed_day() {
        let schedule = Schedule::default();
        // 2024-06-09 is a Sunday
        let err = validate_request(&schedule, &request("2024-06-09", "09:00")).unwrap_err();
        assert!(matches!(err, BookingError::Closed { .. }));
        assert_eq!(
            err.to_string(),
            "We are closed on Sundays. Please choose another day."
        );
    }

    #[test]
    fn test_outside_business_hours() {
        let schedule = Schedule::default();
        for time in ["07:00", "17:00", "20:00"] {
            let err = validate_request(&schedule, &request("2024-06-10", time)).unwrap_err();
            assert!(matches!(err, BookingError::OutsideBusinessHours { .. }), "{time}");
        }
        assert!(validate_request(&schedule, &request("2024-06-10", "08:00")).is_ok());
        assert!(validate_request(&schedule, &request("2024-06-10", "16:00")).is_ok());
    }

    #[test]
    fn test_off_grid_time_checked_after_closed_day_and_hours() {
        let schedule = Schedule::default();
        // Sunday at half past: the closed day wins
        assert!(matches!(
            validate_request(&schedule, &request("2024-06-09", "09:30")),
            Err(BookingError::Closed { .. })
        ));
        assert!(matches!(
            validate_request(&schedule, &request("2024-06-09", "99:00")),
            Err(BookingError::Closed { .. })
        ));
        assert!(matches!(
            validate_request(&schedule, &request("2024-06-10", "25:00")),
            Err(BookingError::OutsideBusinessHours { .. })
        ));
        assert!(matches!(
            validate_request(&schedule, &request("2024-06-10", "09:xx")),
            Err(BookingError::InvalidTime)
        ));
        assert!(matches!(
            validate_request(&schedule, &request("2024-06-10", "9")),
            Err(BookingError::InvalidTime)
        ));
    }

    #[test]
    fn test_single_digit_hour_normalized() {
        let slot = validate_request(&Schedule::default(), &request("2024-06-10", "9:00")).unwrap();
        assert_eq!(slot.time, "09:00");
    }

    #[test]
    fn test_closed_day_checked_before_hours() {
        let schedule = Schedule::default();
        let err = validate_request(&schedule, &request("2024-06-09", "22:00")).unwrap_err();
        assert!(matches!(err, BookingError::Closed { .. }));
    }

    #[test]
    fn test_create_defaults() {
        let conn = setup_db();
        let mut req = request("2024-06-10", "09:00");
        req.client_email = Some("".to_string());
        let booking = create_booking(&conn, &Schedule::default(), req).unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.service, DEFAULT_SERVICE);
        assert_eq!(booking.client_email, None);
        assert_eq!(booking.time, "09:00");

        let stored = queries::get_booking_by_id(&conn, &booking.id).unwrap().unwrap();
        assert_eq!(stored.created_at, booking.created_at);
    }

    #[test]
    fn test_conflict_with_live_booking() {
        let conn = setup_db();
        let schedule = Schedule::default();
        create_booking(&conn, &schedule, request("2024-06-10", "09:00")).unwrap();

        let err = create_booking(&conn, &schedule, request("2024-06-10", "09:00")).unwrap_err();
        assert!(matches!(err, BookingError::SlotTaken));
    }

    #[test]
    fn test_rejected_slot_can_be_rebooked() {
        let conn = setup_db();
        let schedule = Schedule::default();
        let first = create_booking(&conn, &schedule, request("2024-06-10", "09:00")).unwrap();
        assert!(queries::decide_booking(&conn, &first.id, BookingStatus::Rejected).unwrap());

        let second = create_booking(&conn, &schedule, request("2024-06-10", "09:00")).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_error_mapping() {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        let conflict: AppError = BookingError::SlotTaken.into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let missing: AppError = BookingError::MissingFields.into();
        assert_eq!(missing.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
