// Aircraft domain module
// ADS-B snapshot decoding, the prepared per-day dataset and submitted positions

pub mod dataset;
pub mod models;
pub mod snapshot;
pub mod tracked;

pub use dataset::{DatasetBuilder, PreparedDataset};
pub use models::{Aircraft, AircraftStats, Position};
pub use snapshot::{decode_snapshot, Snapshot, SnapshotError};
pub use tracked::{TrackedPosition, TypeCount};

/// Day partition the sample archive is read from
pub const SAMPLE_DAY: &str = "day=20231101";

/// Path of the sample day inside the archive
pub const SAMPLE_DATE_PATH: &str = "2023/11/01";

/// One file per hour: `000000Z.json.gz` through `230000Z.json.gz`
pub fn hourly_file_names() -> impl Iterator<Item = String> {
    (0..24).map(|hour| format!("{:02}0000Z.json.gz", hour))
}

/// Raw files `prepare` picks up
pub fn is_snapshot_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".json") || lower.ends_with(".json.gz")
}
