use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::db::queries::{self, BookingFilter};
use crate::errors::AppError;
use crate::handlers::{check_auth, non_blank, parse_date};
use crate::models::{Booking, BookingStatus};
use crate::state::AppState;

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct AdminBookingsQuery {
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AdminBookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let status = non_blank(&query.status)
        .map(|s| {
            BookingStatus::parse(s)
                .ok_or_else(|| AppError::validation(format!("Invalid status filter: {s}")))
        })
        .transpose()?;
    let from = non_blank(&query.from).map(parse_date).transpose()?;
    let to = non_blank(&query.to).map(parse_date).transpose()?;

    let filter = BookingFilter { status, from, to };

    let bookings = {
        let db = state.db()?;
        queries::list_bookings(&db, &filter)?
    };

    Ok(Json(bookings))
}
