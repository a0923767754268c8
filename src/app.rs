use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze_form))
        .route("/api/defaults", get(handlers::get_defaults))
        .route("/api/analyze", post(handlers::analyze_json))
        .route("/api/chart.svg", post(handlers::chart_svg))
        .with_state(state)
}
