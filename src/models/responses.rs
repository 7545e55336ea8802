//! Response DTOs for the stations API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::stations::StationRecord;

/// A station as returned by the API, including derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResponse {
    pub number: u32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub bike_stands: u32,
    pub available_bikes: u32,
    pub available_bike_stands: u32,
    pub status: String,
    /// Percentage of stands holding a bike
    pub occupancy: f64,
    /// Last update in RFC 3339 (UTC)
    pub last_update: Option<String>,
    /// Last update in Unix milliseconds
    pub last_update_epoch: i64,
}

impl From<&StationRecord> for StationResponse {
    fn from(record: &StationRecord) -> Self {
        Self {
            number: record.number,
            name: record.name.clone(),
            address: record.address.clone(),
            latitude: record.position.lat,
            longitude: record.position.lng,
            bike_stands: record.bike_stands,
            available_bikes: record.available_bikes,
            available_bike_stands: record.available_bike_stands,
            status: record.status.clone(),
            occupancy: record.occupancy(),
            last_update: DateTime::<Utc>::from_timestamp_millis(record.last_update)
                .map(|t| t.to_rfc3339()),
            last_update_epoch: record.last_update,
        }
    }
}

impl From<StationRecord> for StationResponse {
    fn from(record: StationRecord) -> Self {
        Self::from(&record)
    }
}

/// Response body for the cache stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Number of stations currently held
    pub stations: usize,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(stations: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            stations,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::test_support::sample_records;

    #[test]
    fn test_station_response_serialize() {
        let resp = StationResponse::from(&sample_records()[0]);
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["number"], 1);
        assert_eq!(json["bikeStands"], 20);
        assert_eq!(json["availableBikes"], 5);
        assert_eq!(json["occupancy"], 25.0);
        assert_eq!(json["lastUpdateEpoch"], 1_729_065_138_000i64);
        assert!(json["lastUpdate"].as_str().unwrap().starts_with("2024-10-16"));
    }

    #[test]
    fn test_cache_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        let resp = CacheStatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["hits"], 80);
        assert!(json.get("hitRate").is_some());
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(3);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
