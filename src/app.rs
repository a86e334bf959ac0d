use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/today", get(handlers::get_today))
        .route("/api/goal", put(handlers::set_goal))
        .route("/api/foods", get(handlers::list_foods).post(handlers::add_food))
        .route("/api/foods/:id", delete(handlers::remove_food))
        .route(
            "/api/entries",
            post(handlers::add_entry).delete(handlers::reset_entries),
        )
        .route("/api/entries/:id", delete(handlers::remove_entry))
        .route("/api/catalog/export", get(handlers::export_catalog))
        .route("/api/catalog/import", post(handlers::import_catalog))
        .with_state(state)
}
