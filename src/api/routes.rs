//! API Routes
//!
//! Configures the Axum router with all station endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, create_station_handler, delete_station_handler, get_station_handler,
    health_handler, list_stations_handler, summary_handler, update_station_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/v1/stations` - Filtered, sorted, paged station list
/// - `POST /api/v1/stations` - Create a station
/// - `GET /api/v1/stations/summary` - Aggregate statistics
/// - `GET /api/v1/stations/:number` - Single station
/// - `PUT /api/v1/stations/:number` - Partial update
/// - `DELETE /api/v1/stations/:number` - Delete a station
/// - `GET /cache/stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin so the browser front-end can call the API
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let stations = Router::new()
        .route("/", get(list_stations_handler).post(create_station_handler))
        .route("/summary", get(summary_handler))
        .route(
            "/:number",
            get(get_station_handler)
                .put(update_station_handler)
                .delete(delete_station_handler),
        );

    Router::new()
        .nest("/api/v1/stations", stations)
        .route("/cache/stats", get(cache_stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
