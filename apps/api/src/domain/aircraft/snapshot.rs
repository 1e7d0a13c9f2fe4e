use std::io::Read;

use flate2::read::GzDecoder;
use serde::Deserialize;
use thiserror::Error;

/// Errors decoding a raw ADS-B snapshot file
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to decompress snapshot: {0}")]
    Gzip(#[from] std::io::Error),

    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One readsb-hist snapshot (`HHMMSSZ.json.gz`)
///
/// Only the fields the service uses are decoded; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    /// Unix time the snapshot was taken
    #[serde(default)]
    pub now: Option<f64>,
    /// `None` when the file has no `aircraft` array
    #[serde(default)]
    pub aircraft: Option<Vec<SnapshotAircraft>>,
}

/// One aircraft entry of a snapshot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotAircraft {
    /// ICAO 24-bit address in hex
    #[serde(default)]
    pub hex: Option<String>,
    /// Registration (tail number)
    #[serde(default, rename = "r")]
    pub registration: Option<String>,
    /// Type designator, e.g. `A320`
    #[serde(default, rename = "t")]
    pub aircraft_type: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub alt_baro: Option<BaroAltitude>,
    /// Ground speed in knots
    #[serde(default)]
    pub gs: Option<f64>,
    /// Seconds between the last position update and `now`
    #[serde(default)]
    pub seen_pos: Option<f64>,
    #[serde(default)]
    pub emergency: Option<String>,
}

/// Barometric altitude: feet, or a marker such as `"ground"`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BaroAltitude {
    Feet(f64),
    Marker(String),
}

impl BaroAltitude {
    /// Altitude in feet; `"ground"` is 0, other markers are unknown
    pub fn feet(&self) -> Option<f64> {
        match self {
            BaroAltitude::Feet(feet) => Some(*feet),
            BaroAltitude::Marker(marker) if marker == "ground" => Some(0.0),
            BaroAltitude::Marker(_) => None,
        }
    }
}

impl SnapshotAircraft {
    /// Time of the position fix: `now - seen_pos`, or `now` when unknown
    pub fn position_time(&self, now: Option<f64>) -> Option<f64> {
        match (now, self.seen_pos) {
            (Some(now), Some(seen)) => Some(now - seen),
            (now, _) => now,
        }
    }

    /// True when the transponder reports an emergency
    pub fn has_emergency(&self) -> bool {
        self.emergency
            .as_deref()
            .map(|e| !e.is_empty() && !e.eq_ignore_ascii_case("none"))
            .unwrap_or(false)
    }
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decodes a snapshot that may or may not be gzip-compressed
///
/// Valid JSON that is not an object decodes to an empty snapshot, which the
/// dataset builder skips.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    let value: serde_json::Value = if bytes.starts_with(&GZIP_MAGIC) {
        let mut json = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut json)?;
        serde_json::from_slice(&json)?
    } else {
        serde_json::from_slice(bytes)?
    };

    if !value.is_object() {
        return Ok(Snapshot::default());
    }
    Ok(serde_json::from_value(value)?)
}
