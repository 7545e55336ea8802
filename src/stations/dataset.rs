//! Dataset Module
//!
//! Loads the static station dataset used to seed the store at startup.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Result, StationError};
use crate::stations::StationRecord;

/// Reads and parses the dataset file at `path`.
///
/// Fails with `StationError::Data` if the file cannot be read, is not a JSON
/// array of stations, or does not pass [`validate`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<StationRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        StationError::Data(format!("cannot read {}: {}", path.display(), e))
    })?;

    let records = parse(&content)?;
    info!("Parsed {} stations from {}", records.len(), path.display());
    Ok(records)
}

/// Parses a JSON array of stations and validates it.
pub fn parse(json: &str) -> Result<Vec<StationRecord>> {
    let records: Vec<StationRecord> = serde_json::from_str(json)
        .map_err(|e| StationError::Data(format!("malformed station JSON: {}", e)))?;
    validate(&records)?;
    Ok(records)
}

/// Checks that a dataset is non-empty, has unique numbers and valid coordinates.
pub fn validate(records: &[StationRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(StationError::Data("no stations in dataset".to_string()));
    }

    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.number) {
            return Err(StationError::Data(format!(
                "duplicate station number {}",
                record.number
            )));
        }
        if !record.position.is_valid() {
            return Err(StationError::Data(format!(
                "station {} has out-of-range coordinates",
                record.number
            )));
        }
    }

    Ok(())
}
