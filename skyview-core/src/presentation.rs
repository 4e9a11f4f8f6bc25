//! Display strings for the results panel.

use crate::{
    WeatherRecord,
    time::{local_time, utc_offset_hours},
};

/// Shown in place of optional readings the station did not report.
pub const NOT_APPLICABLE: &str = "N/A";

/// One labelled line of the details table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

fn row(label: &'static str, value: String) -> DetailRow {
    DetailRow { label, value }
}

fn optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v} {unit}"),
        None => format!("{NOT_APPLICABLE} {unit}"),
    }
}

/// "London, GB", or just "London" without a country code.
pub fn headline(record: &WeatherRecord) -> String {
    match &record.country_code {
        Some(country) => format!("{}, {country}", record.city_name),
        None => record.city_name.clone(),
    }
}

/// "14.2°C"
pub fn temperature(record: &WeatherRecord) -> String {
    format!("{}°C", record.temperature.current)
}

pub fn sunrise(record: &WeatherRecord) -> String {
    local_time(record.sunrise, record.utc_offset_seconds)
}

pub fn sunset(record: &WeatherRecord) -> String {
    local_time(record.sunset, record.utc_offset_seconds)
}

/// Every reading of `record`, in panel order.
pub fn detail_rows(record: &WeatherRecord) -> Vec<DetailRow> {
    let (lon, lat) = match record.coordinates {
        Some(c) => (c.lon.to_string(), c.lat.to_string()),
        None => (NOT_APPLICABLE.to_string(), NOT_APPLICABLE.to_string()),
    };
    let t = &record.temperature;
    let a = &record.atmosphere;
    let w = &record.wind;

    vec![
        row("Longitude", lon),
        row("Latitude", lat),
        row("Temperature", format!("{}°C", t.current)),
        row("Feels Like", format!("{}°C", t.feels_like)),
        row("Min Temperature", format!("{}°C", t.min)),
        row("Max Temperature", format!("{}°C", t.max)),
        row("Pressure", format!("{} hPa", a.pressure)),
        row("Humidity", format!("{} %", a.humidity_pct)),
        row("Sea Level", optional(a.sea_level, "hPa")),
        row("Ground Level", optional(a.ground_level, "hPa")),
        row("Visibility", optional(record.visibility_m, "m")),
        row("Wind Speed", format!("{} m/s", w.speed_mps)),
        row("Wind Direction", format!("{}°", w.direction_deg)),
        row("Wind Gust", optional(w.gust_mps, "m/s")),
        row("Cloudiness", format!("{} %", record.cloudiness_pct)),
        row("Sunrise", sunrise(record)),
        row("Sunset", sunset(record)),
        row(
            "Timezone",
            format!("{} hours from UTC", utc_offset_hours(record.utc_offset_seconds)),
        ),
        row("City ID", record.city_id.to_string()),
        row("Base", record.base.clone()),
    ]
}
