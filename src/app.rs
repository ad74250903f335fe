use std::sync::Arc;

use axum::routing::{get, patch};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/services", get(handlers::catalog::get_catalog))
        .route("/api/slots", get(handlers::slots::get_slots))
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route("/api/bookings/:id", patch(handlers::bookings::update_status))
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/calendar/:booking_id",
            get(handlers::calendar::download_ics),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                tracing::info_span!("http_request", method = %req.method(), uri = %req.uri())
            }),
        )
}
