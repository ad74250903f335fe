use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::BookingStatus;
use crate::services::calendar::{generate_ics, DEFAULT_DURATION_MINUTES};
use crate::state::AppState;

// GET /api/calendar/:booking_id
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let booking_id = raw_id.strip_suffix(".ics").unwrap_or(&raw_id);

    let booking = {
        let db = state.db()?;
        queries::get_booking_by_id(&db, booking_id)?
    }
    .ok_or_else(|| AppError::not_found("Booking not found"))?;

    if booking.status != BookingStatus::Approved {
        return Err(AppError::conflict("Booking has not been approved"));
    }

    let duration = state
        .schedule
        .service_duration(&booking.service)
        .unwrap_or(DEFAULT_DURATION_MINUTES);
    let ics = generate_ics(&booking, &state.config.business_name, duration)?;
    let filename = format!("booking-{booking_id}.ics");

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
