use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::{non_blank, parse_date};
use crate::services::availability::{self, DaySlots, Slot};
use crate::state::AppState;

// GET /api/slots
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    slots: Vec<Slot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let raw = non_blank(&query.date).ok_or_else(|| AppError::validation("Date parameter required"))?;
    let date = parse_date(raw)?;

    let day = {
        let db = state.db()?;
        availability::available_slots(&db, &state.schedule, &date)?
    };

    let response = match day {
        DaySlots::Open(slots) => SlotsResponse {
            slots,
            date: Some(date.format("%Y-%m-%d").to_string()),
            message: None,
        },
        DaySlots::Closed { message } => SlotsResponse {
            slots: vec![],
            date: None,
            message: Some(message),
        },
    };

    Ok(Json(response))
}
