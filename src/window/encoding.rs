//! Cyclical time encodings for window features
//!
//! Each calendar cycle is mapped onto the unit circle so that midnight sits
//! next to 23:00 and December next to January. Three cycles are encoded:
//! hour of day, day of year, and the 27-day solar rotation period.

use chrono::{DateTime, Datelike, Timelike, Utc};
use ndarray::Array2;

/// Number of columns produced by [`encode_timestamps`]
pub const TIME_ENC_COLS: usize = 6;

/// Synodic solar rotation period in days, the recurrence scale of
/// geomagnetic activity driven by long-lived coronal features
pub const SOLAR_ROTATION_DAYS: f64 = 27.0;

const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_YEAR: f64 = 365.25;
const SECONDS_PER_DAY: f64 = 86_400.0;

fn hour_phase(t: &DateTime<Utc>) -> f64 {
    2.0 * std::f64::consts::PI * f64::from(t.hour()) / HOURS_PER_DAY
}

fn day_of_year_phase(t: &DateTime<Utc>) -> f64 {
    2.0 * std::f64::consts::PI * f64::from(t.ordinal()) / DAYS_PER_YEAR
}

fn solar_rotation_phase(t: &DateTime<Utc>) -> f64 {
    let days = unix_seconds(t) / SECONDS_PER_DAY;
    2.0 * std::f64::consts::PI * days / SOLAR_ROTATION_DAYS
}

/// Seconds since the Unix epoch with microsecond resolution
fn unix_seconds(t: &DateTime<Utc>) -> f64 {
    t.timestamp() as f64 + f64::from(t.timestamp_subsec_micros()) / 1e6
}

fn encode_phase(
    timestamps: &[DateTime<Utc>],
    phase: impl Fn(&DateTime<Utc>) -> f64,
) -> Array2<f64> {
    let mut out = Array2::zeros((timestamps.len(), 2));
    for (i, t) in timestamps.iter().enumerate() {
        let p = phase(t);
        out[[i, 0]] = p.sin();
        out[[i, 1]] = p.cos();
    }
    out
}

/// Encode the hour of day as `(sin, cos)` columns
pub fn encode_hour(timestamps: &[DateTime<Utc>]) -> Array2<f64> {
    encode_phase(timestamps, hour_phase)
}

/// Encode the one-based day of year as `(sin, cos)` columns over a 365.25
/// day cycle
pub fn encode_day_of_year(timestamps: &[DateTime<Utc>]) -> Array2<f64> {
    encode_phase(timestamps, day_of_year_phase)
}

/// Encode the phase within the 27-day solar rotation as `(sin, cos)` columns
pub fn encode_solar_rotation(timestamps: &[DateTime<Utc>]) -> Array2<f64> {
    encode_phase(timestamps, solar_rotation_phase)
}

/// Encode all three cycles into one `n x 6` matrix with the fixed column
/// layout `[hour_sin, hour_cos, doy_sin, doy_cos, rot_sin, rot_cos]`
pub fn encode_timestamps(timestamps: &[DateTime<Utc>]) -> Array2<f64> {
    let mut out = Array2::zeros((timestamps.len(), TIME_ENC_COLS));
    for (i, t) in timestamps.iter().enumerate() {
        let hour = hour_phase(t);
        let doy = day_of_year_phase(t);
        let rot = solar_rotation_phase(t);
        out[[i, 0]] = hour.sin();
        out[[i, 1]] = hour.cos();
        out[[i, 2]] = doy.sin();
        out[[i, 3]] = doy.cos();
        out[[i, 4]] = rot.sin();
        out[[i, 5]] = rot.cos();
    }
    out
}
