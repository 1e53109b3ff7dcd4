use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/agregados", get(handlers::catalog))
        .route("/agregados/select", post(handlers::catalog_select))
        .route("/ipca", get(handlers::explorer))
        .route("/ipca/toggle", post(handlers::explorer_toggle))
        .route("/ipca/clear", post(handlers::explorer_clear))
        .route("/ipca/page", post(handlers::explorer_page))
        .route("/api/health", get(handlers::health))
        .route("/api/agregados", get(handlers::get_catalog))
        .route("/api/agregados/select", post(handlers::post_catalog_select))
        .route("/api/ipca", get(handlers::get_explorer))
        .route("/api/ipca/actions", post(handlers::post_explorer_action))
        .with_state(state)
}
