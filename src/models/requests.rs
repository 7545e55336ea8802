//! Request DTOs for the stations API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;

use crate::stations::{
    query::{clamp_page, clamp_page_size},
    NewStation, Position, SortDirection, SortKey, StationPatch, StationQuery, DEFAULT_PAGE_SIZE,
    DEFAULT_STATUS,
};

/// Longest accepted station name, in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Longest accepted station address, in characters
pub const MAX_ADDRESS_LENGTH: usize = 200;

/// Largest accepted capacity or availability count
pub const MAX_STANDS: u32 = 100;

// == List Stations Params ==
/// Query string for GET /api/v1/stations
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStationsParams {
    /// Status filter (OPEN/CLOSED), case-insensitive
    pub status: Option<String>,
    /// Minimum available bikes
    pub min_bikes: Option<i64>,
    /// Search term for name and address
    pub q: Option<String>,
    /// Sort field (name, availableBikes, occupancy)
    pub sort: Option<String>,
    /// Sort direction (asc/desc)
    pub dir: Option<String>,
    /// Page number (default 1)
    pub page: Option<i64>,
    /// Page size (default 10, max 100)
    pub page_size: Option<i64>,
}

impl ListStationsParams {
    /// Converts to a store query with page bounds clamped.
    pub fn to_query(&self) -> StationQuery {
        StationQuery {
            status: self.status.clone(),
            // Negative minimums filter nothing
            min_bikes: self
                .min_bikes
                .map(|m| m.clamp(0, i64::from(u32::MAX)) as u32),
            search: self.q.clone(),
            sort: SortKey::parse(self.sort.as_deref()),
            direction: SortDirection::parse(self.dir.as_deref()),
            page: clamp_page(self.page.unwrap_or(1)),
            page_size: clamp_page_size(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE as i64)),
        }
    }

    /// Deterministic cache key covering the full query signature.
    ///
    /// Built from the normalized query, so requests that run the same query
    /// share a key. Fields are JSON-encoded and cannot run into each other.
    pub fn cache_key(&self) -> String {
        let query = self.to_query();
        let status = non_blank(query.status.as_deref()).map(str::to_ascii_lowercase);
        let search = non_blank(query.search.as_deref()).map(str::to_lowercase);
        let direction = match query.sort {
            SortKey::Number => SortDirection::Asc,
            _ => query.direction,
        };

        let signature = serde_json::json!([
            status,
            query.min_bikes,
            search,
            query.sort.as_str(),
            direction.as_str(),
            query.page,
            query.page_size
        ]);
        format!("stations_{}", signature)
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

// == Create Station Request ==
/// Request body for POST /api/v1/stations
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStationRequest {
    pub number: u32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub bike_stands: u32,
    #[serde(default)]
    pub available_bikes: u32,
    /// Defaults to bike_stands - available_bikes
    #[serde(default)]
    pub available_bike_stands: Option<u32>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

impl CreateStationRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_name(&self.name)
            .or_else(|| validate_address(&self.address))
            .or_else(|| validate_latitude(self.latitude))
            .or_else(|| validate_longitude(self.longitude))
            .or_else(|| validate_bike_stands(self.bike_stands))
            .or_else(|| validate_count("availableBikes", self.available_bikes))
            .or_else(|| {
                self.available_bike_stands
                    .and_then(|v| validate_count("availableBikeStands", v))
            })
    }

    pub fn into_new_station(self) -> NewStation {
        NewStation {
            number: self.number,
            name: self.name,
            address: self.address,
            position: Position {
                lat: self.latitude,
                lng: self.longitude,
            },
            bike_stands: self.bike_stands,
            available_bikes: self.available_bikes,
            available_bike_stands: self.available_bike_stands,
            status: self.status,
        }
    }
}

// == Update Station Request ==
/// Request body for PUT /api/v1/stations/:number; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStationRequest {
    /// Station numbers are immutable; a different value is rejected
    pub number: Option<u32>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bike_stands: Option<u32>,
    pub available_bikes: Option<u32>,
    pub available_bike_stands: Option<u32>,
    pub status: Option<String>,
}

impl UpdateStationRequest {
    /// Validates the fields that are present
    pub fn validate(&self) -> Option<String> {
        self.name
            .as_deref()
            .and_then(validate_name)
            .or_else(|| self.address.as_deref().and_then(validate_address))
            .or_else(|| self.latitude.and_then(validate_latitude))
            .or_else(|| self.longitude.and_then(validate_longitude))
            .or_else(|| self.bike_stands.and_then(validate_bike_stands))
            .or_else(|| {
                self.available_bikes
                    .and_then(|v| validate_count("availableBikes", v))
            })
            .or_else(|| {
                self.available_bike_stands
                    .and_then(|v| validate_count("availableBikeStands", v))
            })
    }

    pub fn into_patch(self) -> StationPatch {
        StationPatch {
            number: self.number,
            name: self.name,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            bike_stands: self.bike_stands,
            available_bikes: self.available_bikes,
            available_bike_stands: self.available_bike_stands,
            status: self.status,
        }
    }
}

// == Field Validation ==
fn validate_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return Some("Name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Some(format!(
            "Name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        ));
    }
    None
}

fn validate_address(address: &str) -> Option<String> {
    if address.trim().is_empty() {
        return Some("Address cannot be empty".to_string());
    }
    if address.chars().count() > MAX_ADDRESS_LENGTH {
        return Some(format!(
            "Address exceeds maximum length of {} characters",
            MAX_ADDRESS_LENGTH
        ));
    }
    None
}

fn validate_latitude(lat: f64) -> Option<String> {
    (!(-90.0..=90.0).contains(&lat)).then(|| "Latitude must be between -90 and 90".to_string())
}

fn validate_longitude(lng: f64) -> Option<String> {
    (!(-180.0..=180.0).contains(&lng))
        .then(|| "Longitude must be between -180 and 180".to_string())
}

fn validate_bike_stands(bike_stands: u32) -> Option<String> {
    (!(1..=MAX_STANDS).contains(&bike_stands))
        .then(|| format!("bikeStands must be between 1 and {}", MAX_STANDS))
}

fn validate_count(field: &str, value: u32) -> Option<String> {
    (value > MAX_STANDS).then(|| format!("{} must be between 0 and {}", field, MAX_STANDS))
}
