use std::collections::BTreeMap;

use super::models::{Aircraft, Position};
use super::snapshot::Snapshot;

/// Everything `prepare` writes for one day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedDataset {
    /// Unique by ICAO, ordered by ICAO
    pub aircraft: Vec<Aircraft>,
    /// In ingestion order
    pub positions: Vec<Position>,
}

/// Folds snapshots into a [`PreparedDataset`]
///
/// # Rules
/// - Entries without `hex` are dropped
/// - The last snapshot that mentions an aircraft wins its registration/type
/// - A position is kept only when both `lat` and `lon` are present
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    aircraft: BTreeMap<String, Aircraft>,
    positions: Vec<Position>,
    snapshots: usize,
    skipped_snapshots: usize,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a snapshot; returns false when it had no `aircraft` array
    pub fn ingest(&mut self, snapshot: Snapshot) -> bool {
        let Some(entries) = snapshot.aircraft else {
            self.skipped_snapshots += 1;
            return false;
        };
        self.snapshots += 1;

        for entry in entries {
            let Some(icao) = entry.hex.clone().filter(|h| !h.is_empty()) else {
                continue;
            };

            if let (Some(lat), Some(lon)) = (entry.lat, entry.lon) {
                self.positions.push(Position {
                    icao: icao.clone(),
                    timestamp: entry.position_time(snapshot.now),
                    lat,
                    lon,
                    alt_baro: entry.alt_baro.as_ref().and_then(|alt| alt.feet()),
                    ground_speed: entry.gs,
                    emergency: entry.has_emergency(),
                });
            }

            self.aircraft.insert(
                icao.clone(),
                Aircraft {
                    icao,
                    registration: entry.registration,
                    aircraft_type: entry.aircraft_type,
                },
            );
        }

        true
    }

    pub fn snapshots(&self) -> usize {
        self.snapshots
    }

    pub fn skipped_snapshots(&self) -> usize {
        self.skipped_snapshots
    }

    pub fn finish(self) -> PreparedDataset {
        PreparedDataset {
            aircraft: self.aircraft.into_values().collect(),
            positions: self.positions,
        }
    }
}
