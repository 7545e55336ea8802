//! API Module
//!
//! HTTP handlers and routing for the stations REST API.
//!
//! # Endpoints
//! - `GET|POST /api/v1/stations` - Query or create stations
//! - `GET /api/v1/stations/summary` - Aggregate statistics
//! - `GET|PUT|DELETE /api/v1/stations/:number` - Single-station operations
//! - `GET /cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
