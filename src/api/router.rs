use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_auth;
use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Protected API routes — require Bearer token when API_TOKEN is set
    let protected = Router::new()
        // Signal ingest boundary for the strategy evaluation engine
        .route("/api/signals", post(handlers::signals::dispatch))
        // Quota widget
        .route("/api/strategies/:id/quota", get(handlers::quota::usage))
        // Notification history
        .route("/api/deliveries", get(handlers::deliveries::list))
        .layer(middleware::from_fn(require_auth));

    // CORS: the dashboard is proxied from the same origin; direct access
    // still needs the bearer token.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
