//! Station Store Module
//!
//! Sole owner of the station records. Every read and write goes through a
//! single collection-wide lock; reads copy data out before releasing it.

use std::collections::BTreeMap;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Result, StationError};
use crate::stations::{
    dataset, query, NewStation, Page, StationPatch, StationQuery, StationRecord, StationsSummary,
};

// == Station Store ==
/// Concurrent in-memory station store keyed by station number.
#[derive(Debug, Default)]
pub struct StationStore {
    stations: Mutex<BTreeMap<u32, StationRecord>>,
}

impl StationStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `records`.
    pub async fn with_records(records: Vec<StationRecord>) -> Result<Self> {
        let store = Self::new();
        store.load(records).await?;
        Ok(store)
    }

    // == Load ==
    /// Replaces the entire collection atomically.
    ///
    /// Fails with `StationError::Data` if `records` is empty or invalid; the
    /// existing collection is left untouched in that case.
    pub async fn load(&self, records: Vec<StationRecord>) -> Result<usize> {
        dataset::validate(&records)?;

        let fresh: BTreeMap<u32, StationRecord> =
            records.into_iter().map(|r| (r.number, r)).collect();
        let count = fresh.len();

        *self.stations.lock().await = fresh;
        info!("Loaded {} stations", count);
        Ok(count)
    }

    // == List ==
    /// Returns a point-in-time copy of every record, ordered by number.
    pub async fn list(&self) -> Vec<StationRecord> {
        self.stations.lock().await.values().cloned().collect()
    }

    // == Query ==
    /// Runs the query pipeline over a consistent snapshot.
    pub async fn query(&self, query: &StationQuery) -> Page<StationRecord> {
        let snapshot = self.list().await;
        query::execute(snapshot, query)
    }

    // == Get ==
    /// Returns a copy of the station with `number`, if any.
    pub async fn get(&self, number: u32) -> Option<StationRecord> {
        self.stations.lock().await.get(&number).cloned()
    }

    // == Create ==
    /// Inserts a new station.
    ///
    /// Fails with `StationError::Conflict` if the number is taken; the store is
    /// unchanged in that case.
    pub async fn create(&self, new_station: NewStation) -> Result<StationRecord> {
        let mut stations = self.stations.lock().await;

        if stations.contains_key(&new_station.number) {
            warn!("Station {} already exists", new_station.number);
            return Err(StationError::Conflict(new_station.number));
        }

        let record = new_station.into_record(now_ms());
        stations.insert(record.number, record.clone());
        info!("Created station {} - {}", record.number, record.name);
        Ok(record)
    }

    // == Update ==
    /// Applies a partial update and refreshes `last_update`.
    ///
    /// Fails with `StationError::NotFound` if `number` is absent, or
    /// `StationError::Conflict` if the patch tries to change the number.
    pub async fn update(&self, number: u32, patch: StationPatch) -> Result<StationRecord> {
        if let Some(requested) = patch.number.filter(|n| *n != number) {
            warn!("Rejected renumbering of station {} to {}", number, requested);
            return Err(StationError::Conflict(requested));
        }

        let mut stations = self.stations.lock().await;
        let record = stations
            .get_mut(&number)
            .ok_or(StationError::NotFound(number))?;

        patch.apply_to(record);
        record.touch(now_ms());
        info!("Updated station {} - {}", record.number, record.name);
        Ok(record.clone())
    }

    // == Delete ==
    /// Removes the station. Returns false if it did not exist.
    pub async fn delete(&self, number: u32) -> bool {
        match self.stations.lock().await.remove(&number) {
            Some(record) => {
                info!("Deleted station {} - {}", record.number, record.name);
                true
            }
            None => {
                warn!("Station {} not found for deletion", number);
                false
            }
        }
    }

    // == Set Availability ==
    /// Overwrites the two availability counts. No-op if `number` is absent.
    pub async fn set_availability(
        &self,
        number: u32,
        available_bikes: u32,
        available_bike_stands: u32,
    ) {
        let mut stations = self.stations.lock().await;
        match stations.get_mut(&number) {
            Some(record) => {
                record.available_bikes = available_bikes;
                record.available_bike_stands = available_bike_stands;
                record.touch(now_ms());
            }
            None => debug!("Skipping availability update for missing station {}", number),
        }
    }

    // == Summary ==
    /// Aggregates a fresh snapshot of the whole store.
    pub async fn summary(&self) -> StationsSummary {
        let snapshot = self.list().await;
        StationsSummary::from_records(&snapshot)
    }

    // == Length ==
    /// Returns the current number of stations.
    pub async fn len(&self) -> usize {
        self.stations.lock().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.stations.lock().await.is_empty()
    }
}

/// Current Unix timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
