use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/medications",
            get(handlers::list_medications).post(handlers::add_medication),
        )
        .route("/api/selection", put(handlers::select_medication))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/calendar/navigate", post(handlers::navigate))
        .route("/api/calendar/toggle", post(handlers::toggle))
        .route("/api/reminder", get(handlers::get_reminder))
        .route("/api/reminder/dismiss", post(handlers::dismiss_reminder))
        .route("/api/reminder/confirm", post(handlers::confirm_reminder))
        .route("/api/stats", get(handlers::get_stats))
        .with_state(state)
}
