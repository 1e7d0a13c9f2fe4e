use serde::{Deserialize, Serialize};

/// Position report submitted by a client and kept in the document store
///
/// Stored as-is, one document per report; `timestamp` is whatever string the
/// client sent and only orders reports of the same aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedPosition {
    pub icao: String,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default, rename = "type")]
    pub aircraft_type: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub alt_baro: Option<f64>,
    #[serde(default)]
    pub ground_speed: Option<f64>,
    pub timestamp: String,
}

/// Number of stored reports for one aircraft type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    /// `None` groups reports without a type
    pub aircraft_type: Option<String>,
    pub count: i64,
}
