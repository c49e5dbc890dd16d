use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/toggle/:date", post(handlers::toggle_form))
        .route("/nav/prev", post(handlers::nav_prev))
        .route("/nav/next", post(handlers::nav_next))
        .route("/open", post(handlers::reopen))
        .route("/api/month", get(handlers::get_month))
        .route("/api/trend", get(handlers::get_trend))
        .route("/api/day/:date", get(handlers::get_day))
        .route("/api/toggle", post(handlers::toggle))
        .route("/api/navigate", post(handlers::navigate))
        .with_state(state)
}
