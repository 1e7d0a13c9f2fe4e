/// An aircraft seen in the prepared day
#[derive(Debug, Clone, PartialEq)]
pub struct Aircraft {
    pub icao: String,
    pub registration: Option<String>,
    pub aircraft_type: Option<String>,
}

/// A position fix of one aircraft
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub icao: String,
    /// Unix seconds
    pub timestamp: Option<f64>,
    pub lat: f64,
    pub lon: f64,
    /// Feet; 0 on the ground
    pub alt_baro: Option<f64>,
    /// Knots
    pub ground_speed: Option<f64>,
    pub emergency: bool,
}

/// Aggregates over every position of one aircraft
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AircraftStats {
    pub max_altitude_baro: Option<f64>,
    pub max_ground_speed: Option<f64>,
    pub had_emergency: bool,
}
