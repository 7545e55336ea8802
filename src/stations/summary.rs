//! Summary Module
//!
//! Aggregate statistics over a full snapshot of the store.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::stations::record::round2;
use crate::stations::StationRecord;

// == Stations Summary ==
/// Read-only aggregate, recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationsSummary {
    pub total_stations: usize,
    pub total_bike_stands: u64,
    pub total_available_bikes: u64,
    pub total_available_bike_stands: u64,
    /// Station count per status string, as stored
    pub counts_by_status: BTreeMap<String, usize>,
    /// Mean occupancy over stations with at least one stand
    pub average_occupancy: f64,
}

impl StationsSummary {
    /// Computes the summary for `records`.
    pub fn from_records(records: &[StationRecord]) -> Self {
        let mut counts_by_status = BTreeMap::new();
        for record in records {
            *counts_by_status.entry(record.status.clone()).or_insert(0) += 1;
        }

        let occupancies: Vec<f64> = records
            .iter()
            .filter(|r| r.bike_stands > 0)
            .map(StationRecord::occupancy)
            .collect();
        let average_occupancy = if occupancies.is_empty() {
            0.0
        } else {
            round2(occupancies.iter().sum::<f64>() / occupancies.len() as f64)
        };

        Self {
            total_stations: records.len(),
            total_bike_stands: records.iter().map(|r| u64::from(r.bike_stands)).sum(),
            total_available_bikes: records.iter().map(|r| u64::from(r.available_bikes)).sum(),
            total_available_bike_stands: records
                .iter()
                .map(|r| u64::from(r.available_bike_stands))
                .sum(),
            counts_by_status,
            average_occupancy,
        }
    }
}
