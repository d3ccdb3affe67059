pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scraping::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/generate-professor-content",
            post(handlers::handle_generate_professor_content),
        )
        .route(
            "/api/scrape-professor",
            post(handlers::handle_scrape_professor),
        )
        .with_state(state)
}
