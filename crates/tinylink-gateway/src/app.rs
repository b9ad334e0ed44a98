use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{create_short_url_handler, health_handler, redirect_handler, welcome_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(welcome_handler))
            .route("/health", get(health_handler))
            .route("/create-short-url", post(create_short_url_handler))
            .route("/{token}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
