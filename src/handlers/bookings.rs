use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Months, NaiveDate};
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::{check_auth, non_blank, parse_date};
use crate::models::Booking;
use crate::services::booking::{self, NewBooking};
use crate::services::lifecycle::{self, StatusChange};
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = {
        let db = state.db()?;
        booking::create_booking(&db, &state.schedule, body)?
    };

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub date: Option<String>,
    pub month: Option<String>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    if let Some(raw) = non_blank(&query.date) {
        let date = parse_date(raw)?;
        let db = state.db()?;
        return Ok(Json(queries::get_bookings_for_date(&db, &date)?));
    }

    if let Some(raw) = non_blank(&query.month) {
        let (start, end) = month_bounds(raw)?;
        let db = state.db()?;
        return Ok(Json(queries::get_active_bookings_in_range(&db, &start, &end)?));
    }

    Err(AppError::validation("Date or month parameter required"))
}

/// First and last day of a `YYYY-MM` month.
fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let invalid = || AppError::validation(format!("Invalid month: {month}"));

    let start = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(invalid)?;
    Ok((start, end))
}

// PATCH /api/bookings/:id
#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: Option<serde_json::Value>,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<StatusChange>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let status = body.status.as_ref().and_then(|v| v.as_str());
    let change = lifecycle::set_status(&state, &id, status).await?;

    Ok(Json(change))
}
