//! Stations Module
//!
//! Station records, the concurrent record store and its query pipeline.

pub mod dataset;
pub mod query;
mod record;
mod store;
mod summary;


// Re-export public types
pub use query::{Page, SortDirection, SortKey, StationQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use record::{NewStation, Position, StationPatch, StationRecord, DEFAULT_STATUS};
pub use store::{now_ms, StationStore};
pub use summary::StationsSummary;

/// Shared fixtures for unit tests.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Three stations: two OPEN with 5 and 10 bikes, one CLOSED with 0.
    pub const SAMPLE_JSON: &str = r#"[
        {
            "number": 1, "contract_name": "dublin", "name": "TEST STATION 1",
            "address": "Test Address 1", "position": { "lat": 53.34, "lng": -6.26 },
            "banking": false, "bonus": false, "bike_stands": 20,
            "available_bike_stands": 15, "available_bikes": 5,
            "status": "OPEN", "last_update": 1729065138000
        },
        {
            "number": 2, "contract_name": "dublin", "name": "TEST STATION 2",
            "address": "Test Address 2", "position": { "lat": 53.35, "lng": -6.27 },
            "banking": false, "bonus": false, "bike_stands": 30,
            "available_bike_stands": 20, "available_bikes": 10,
            "status": "OPEN", "last_update": 1729065138000
        },
        {
            "number": 3, "contract_name": "dublin", "name": "CLOSED STATION",
            "address": "Closed Address", "position": { "lat": 53.36, "lng": -6.28 },
            "banking": false, "bonus": false, "bike_stands": 25,
            "available_bike_stands": 25, "available_bikes": 0,
            "status": "CLOSED", "last_update": 1729065138000
        }
    ]"#;

    pub fn sample_records() -> Vec<StationRecord> {
        serde_json::from_str(SAMPLE_JSON).unwrap()
    }

    pub async fn sample_store() -> StationStore {
        StationStore::with_records(sample_records()).await.unwrap()
    }

    pub fn new_station(number: u32) -> NewStation {
        NewStation {
            number,
            name: format!("New Station {}", number),
            address: "New Address".to_string(),
            position: Position { lat: 53.34, lng: -6.26 },
            bike_stands: 20,
            available_bikes: 10,
            available_bike_stands: None,
            status: DEFAULT_STATUS.to_string(),
        }
    }
}
