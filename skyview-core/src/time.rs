//! Wall-clock conversion for provider timestamps.
//!
//! OpenWeatherMap reports sunrise/sunset as UTC unix seconds together with the
//! city's UTC offset in seconds. The offset is applied exactly once and the host
//! timezone never takes part.

use chrono::NaiveTime;

const SECONDS_PER_DAY: i64 = 86_400;

/// Format `unix_seconds + utc_offset_seconds` as a 12-hour clock, e.g. `6:30:00 AM`.
pub fn local_time(unix_seconds: i64, utc_offset_seconds: i64) -> String {
    let seconds_of_day = unix_seconds
        .saturating_add(utc_offset_seconds)
        .rem_euclid(SECONDS_PER_DAY);

    // seconds_of_day < 86_400, so the conversion always yields a time.
    let wall = NaiveTime::from_num_seconds_from_midnight_opt(seconds_of_day as u32, 0)
        .unwrap_or_default();

    wall.format("%-I:%M:%S %p").to_string()
}

/// Render a UTC offset as fractional hours: 19800 -> "5.5", -18000 -> "-5".
pub fn utc_offset_hours(utc_offset_seconds: i64) -> String {
    let hours = utc_offset_seconds as f64 / 3600.0;
    format!("{hours}")
}
