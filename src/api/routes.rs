//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_property_handler, delete_property_handler, get_property_handler, health_handler,
    list_properties_handler, login_handler, register_handler, root_handler,
    search_properties_handler, stats_handler, update_property_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Banner
/// - `GET /health` - Health check, including cache reachability
/// - `GET /api/cache/stats` - Coordinator and engine counters
/// - `POST /api/auth/register`, `POST /api/auth/login`
/// - `GET|POST /api/properties`
/// - `GET /api/properties/search`
/// - `GET|PUT|DELETE /api/properties/:id`
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route(
            "/api/properties",
            get(list_properties_handler).post(create_property_handler),
        )
        .route("/api/properties/search", get(search_properties_handler))
        .route(
            "/api/properties/:id",
            get(get_property_handler)
                .put(update_property_handler)
                .delete(delete_property_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
