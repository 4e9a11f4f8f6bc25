use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Temperatures in Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub current: f64,
    pub feels_like: f64,
    pub min: f64,
    pub max: f64,
}

/// Pressures in hPa; sea/ground level are only reported for some stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    pub pressure: f64,
    pub humidity_pct: f64,
    pub sea_level: Option<f64>,
    pub ground_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed_mps: f64,
    pub direction_deg: f64,
    pub gust_mps: Option<f64>,
}

/// Normalized result of a successful city lookup.
///
/// Built only by the query service from a provider response whose status
/// code signalled success. Never mutated afterwards; the controller replaces
/// it wholesale on the next successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city_name: String,
    pub country_code: Option<String>,
    /// Absent only if the provider omitted `coord`; zero is a valid value.
    pub coordinates: Option<Coordinates>,
    pub temperature: Temperature,
    pub atmosphere: Atmosphere,
    /// Meters; some stations do not report it.
    pub visibility_m: Option<f64>,
    pub wind: Wind,
    pub cloudiness_pct: f64,
    pub description: String,
    /// UTC unix seconds.
    pub sunrise: i64,
    /// UTC unix seconds.
    pub sunset: i64,
    /// Seconds east of UTC.
    pub utc_offset_seconds: i64,
    pub city_id: i64,
    pub base: String,
}
