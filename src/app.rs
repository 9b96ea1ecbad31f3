use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/today", get(handlers::get_today))
        .route("/api/sheet", get(handlers::get_sheet))
        .route("/api/cell", post(handlers::edit_cell))
        .route("/api/rows", post(handlers::add_rows))
        .route("/api/save", post(handlers::save))
        .route("/api/toast", get(handlers::get_toast))
        .with_state(state)
}
