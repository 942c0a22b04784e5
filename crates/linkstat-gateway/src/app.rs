use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_url_handler, health_handler, home_handler, redirect_handler, stats_handler,
};
use crate::state::AppState;
use crate::timing::request_timing;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(home_handler))
            .route("/health", get(health_handler))
            .route("/add", post(create_url_handler))
            .route("/u/{short_code}", get(redirect_handler))
            .route("/stats/{short_code}/access/{period}", get(stats_handler))
            .layer(middleware::from_fn(request_timing))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
