//! Station Record Module
//!
//! Defines the station record held by the store, plus the inputs used to
//! create and partially update one.

use serde::{Deserialize, Serialize};

/// Contract name assigned to stations created through the API.
pub const DEFAULT_CONTRACT: &str = "dublin";

/// Status assigned when a create request omits it.
pub const DEFAULT_STATUS: &str = "OPEN";

// == Position ==
/// Geographical coordinates of a station.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    /// Returns true if both coordinates are within their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

// == Station Record ==
/// A single bike-share station.
///
/// Field names follow the public feed format the dataset is shipped in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Unique station identifier, immutable after creation
    pub number: u32,
    #[serde(default)]
    pub contract_name: String,
    pub name: String,
    pub address: String,
    pub position: Position,
    #[serde(default)]
    pub banking: bool,
    #[serde(default)]
    pub bonus: bool,
    /// Total number of stands
    pub bike_stands: u32,
    pub available_bike_stands: u32,
    pub available_bikes: u32,
    /// Free-form, but only OPEN and CLOSED are meaningful
    pub status: String,
    /// Last mutation time (Unix milliseconds)
    #[serde(default)]
    pub last_update: i64,
}

impl StationRecord {
    /// Percentage of stands holding an available bike, rounded to 2 decimals.
    ///
    /// Returns 0 when the station has no stands.
    pub fn occupancy(&self) -> f64 {
        if self.bike_stands == 0 {
            return 0.0;
        }
        round2(self.available_bikes as f64 / self.bike_stands as f64 * 100.0)
    }

    /// Refreshes `last_update`, never moving it backwards.
    pub fn touch(&mut self, now_ms: i64) {
        self.last_update = self.last_update.max(now_ms);
    }
}

// == New Station ==
/// Input for creating a station.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStation {
    pub number: u32,
    pub name: String,
    pub address: String,
    pub position: Position,
    pub bike_stands: u32,
    pub available_bikes: u32,
    /// Defaults to `bike_stands - available_bikes` when absent
    pub available_bike_stands: Option<u32>,
    pub status: String,
}

impl NewStation {
    /// Builds the stored record, stamped with `now_ms`.
    pub fn into_record(self, now_ms: i64) -> StationRecord {
        let available_bike_stands = self
            .available_bike_stands
            .unwrap_or_else(|| self.bike_stands.saturating_sub(self.available_bikes));

        StationRecord {
            number: self.number,
            contract_name: DEFAULT_CONTRACT.to_string(),
            name: self.name,
            address: self.address,
            position: self.position,
            banking: false,
            bonus: false,
            bike_stands: self.bike_stands,
            available_bike_stands,
            available_bikes: self.available_bikes,
            status: self.status,
            last_update: now_ms,
        }
    }
}

// == Station Patch ==
/// Partial update; only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationPatch {
    /// Must match the addressed station if present
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

impl StationPatch {
    /// Applies the present fields to `record`. Does not touch `last_update`.
    pub fn apply_to(self, record: &mut StationRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(address) = self.address {
            record.address = address;
        }
        if let Some(lat) = self.latitude {
            record.position.lat = lat;
        }
        if let Some(lng) = self.longitude {
            record.position.lng = lng;
        }
        if let Some(bike_stands) = self.bike_stands {
            record.bike_stands = bike_stands;
        }
        if let Some(available_bikes) = self.available_bikes {
            record.available_bikes = available_bikes;
        }
        if let Some(available_bike_stands) = self.available_bike_stands {
            record.available_bike_stands = available_bike_stands;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
    }
}

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
