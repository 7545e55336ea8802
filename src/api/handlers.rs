//! API Handlers
//!
//! HTTP request handlers for the stations API. Reads go through the cache
//! first; every successful mutation clears it.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::error::{Result, StationError};
use crate::models::{
    CacheStatsResponse, CreateStationRequest, HealthResponse, ListStationsParams,
    StationResponse, UpdateStationRequest,
};
use crate::stations::{Page, StationStore, StationsSummary};

/// Cache key for the summary aggregate
pub const SUMMARY_CACHE_KEY: &str = "stations_summary";

/// Application state shared across all handlers.
///
/// Holds the station store and the result cache; each synchronizes
/// internally, so the state is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Authoritative station records
    pub stations: Arc<StationStore>,
    /// Memoized read results
    pub cache: Arc<TtlCache>,
    /// TTL applied to every cached result
    pub cache_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState around `stations` with an empty cache.
    pub fn new(stations: StationStore, cache_ttl: Duration) -> Self {
        Self {
            stations: Arc::new(stations),
            cache: Arc::new(TtlCache::new()),
            cache_ttl,
        }
    }

    /// Returns the cached value for `key`, or computes and caches it.
    ///
    /// The result is only stored if the cache was not cleared while it was
    /// being computed.
    async fn cached<T, F, Fut>(&self, key: String, compute: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        if let Some(hit) = self.cache.get::<T>(&key) {
            debug!("Returning cached result for {}", key);
            return hit;
        }

        let generation = self.cache.generation();
        let value = compute().await;
        self.cache
            .set_if_generation(key, value.clone(), self.cache_ttl, generation);
        value
    }
}

fn station_cache_key(number: u32) -> String {
    format!("station_{}", number)
}

/// Handler for GET /api/v1/stations
///
/// Filters, searches, sorts and pages the station list.
pub async fn list_stations_handler(
    State(state): State<AppState>,
    Query(params): Query<ListStationsParams>,
) -> Json<Page<StationResponse>> {
    let query = params.to_query();
    let stations = state.stations.clone();

    let page = state
        .cached(params.cache_key(), || async move {
            stations.query(&query).await.map(StationResponse::from)
        })
        .await;

    Json(page)
}

/// Handler for GET /api/v1/stations/:number
pub async fn get_station_handler(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> Result<Json<StationResponse>> {
    let key = station_cache_key(number);
    if let Some(hit) = state.cache.get::<StationResponse>(&key) {
        debug!("Returning cached result for station {}", number);
        return Ok(Json(hit));
    }

    let generation = state.cache.generation();
    let station = state.stations.get(number).await.ok_or_else(|| {
        warn!("Station {} not found", number);
        StationError::NotFound(number)
    })?;

    let response = StationResponse::from(station);
    state
        .cache
        .set_if_generation(key, response.clone(), state.cache_ttl, generation);
    Ok(Json(response))
}

/// Handler for GET /api/v1/stations/summary
pub async fn summary_handler(State(state): State<AppState>) -> Json<StationsSummary> {
    let stations = state.stations.clone();
    let summary = state
        .cached(SUMMARY_CACHE_KEY.to_string(), || async move {
            stations.summary().await
        })
        .await;

    Json(summary)
}

/// Handler for POST /api/v1/stations
///
/// Creates a station and responds 201 with its location.
pub async fn create_station_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateStationRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<StationResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(StationError::InvalidRequest(error_msg));
    }

    let station = state.stations.create(req.into_new_station()).await?;
    state.cache.clear();

    let location = format!("/api/v1/stations/{}", station.number);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(StationResponse::from(station)),
    ))
}

/// Handler for PUT /api/v1/stations/:number
///
/// Applies the fields present in the body.
pub async fn update_station_handler(
    State(state): State<AppState>,
    Path(number): Path<u32>,
    Json(req): Json<UpdateStationRequest>,
) -> Result<Json<StationResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(StationError::InvalidRequest(error_msg));
    }

    let station = state.stations.update(number, req.into_patch()).await?;
    state.cache.clear();

    Ok(Json(StationResponse::from(station)))
}

/// Handler for DELETE /api/v1/stations/:number
pub async fn delete_station_handler(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> Result<StatusCode> {
    if !state.stations.delete(number).await {
        return Err(StationError::NotFound(number));
    }

    state.cache.clear();
    info!("Station {} deleted successfully", number);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.stations.len().await))
}
