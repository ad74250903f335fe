use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::models::ServiceOffering;
use crate::state::AppState;

// GET /api/services
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    services: Vec<ServiceOffering>,
    opening_hour: u32,
    closing_hour: u32,
    closed_days: Vec<&'static str>,
}

pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    let schedule = &state.schedule;
    Json(CatalogResponse {
        services: schedule.services.clone(),
        opening_hour: schedule.opening_hour,
        closing_hour: schedule.closing_hour,
        closed_days: schedule.closed_day_names(),
    })
}
