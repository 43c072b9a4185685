pub mod calendar;

use std::sync::Arc;

use axum::{routing::get, Router};
use rlka_core::service::CalendarService;
use tower_http::trace::TraceLayer;

pub fn router(service: Arc<CalendarService>) -> Router {
    Router::new()
        .route("/ical", get(calendar::handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
