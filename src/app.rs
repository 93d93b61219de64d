use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/toggle/:target", post(handlers::toggle_flag_form))
        .route("/toggle/:target/:id", post(handlers::toggle_item_form))
        .route("/api/today", get(handlers::get_today))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/entry", post(handlers::update_entry))
        .route("/api/toggle", post(handlers::toggle))
        .route("/api/export", get(handlers::export))
        .route("/api/import", post(handlers::import))
        .route("/api/reset", post(handlers::reset))
        .route("/api/insight", get(handlers::get_insight))
        .route(
            "/api/timer",
            get(handlers::timer_status)
                .post(handlers::timer_start)
                .delete(handlers::timer_cancel),
        )
        .with_state(state)
}
