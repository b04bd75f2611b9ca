//! Merge near-surface observations into a profile.
//!
//! Surface stations report on their own schedule. The record closest in time to the start of the
//! profile is used, as long as it is close enough.
//!
//! Times are in days since -4713-11-24 12:00 UTC in the proleptic Gregorian calendar, which is the
//! Julian date.
use chrono::{DateTime, Duration, NaiveDateTime};
use tracing::{debug, warn};

use crate::{
    dataset::{Dataset, Value},
    error::{DeriveError, Result},
};

/// Variables copied from the surface record.
pub const SURFACE_VARIABLES: [&str; 9] = [
    "hurs", "ps", "tas", "tds", "ts", "uas", "vas", "wdds", "wdss",
];

/// Julian date of 1970-01-01 00:00 UTC.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Options for merging surface observations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    /// Largest time difference between the surface record and the profile start.
    pub tolerance: Duration,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        SurfaceConfig {
            tolerance: Duration::hours(1),
        }
    }
}

impl SurfaceConfig {
    /// One hour tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the time tolerance.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Convert a UTC time to a Julian date.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use sonde_postprocess::surface::julian_date;
///
/// let noon = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// assert_eq!(julian_date(noon), 2_451_545.0);
/// ```
pub fn julian_date(time: NaiveDateTime) -> f64 {
    time.and_utc().timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD
}

/// Convert a Julian date to a UTC time, to the nearest millisecond.
///
/// Returns `None` for dates that are not finite or out of range.
pub fn from_julian_date(jd: f64) -> Option<NaiveDateTime> {
    let millis = ((jd - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }

    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.naive_utc())
}

/// Copy the near-surface variables of the surface record closest to the start of the profile.
///
/// `surface` holds one record per element of its `time` variable. The profile start is the first
/// element of the profile's `time`. If the closest record is further away than the tolerance,
/// nothing is copied and `Ok(false)` is returned. Surface variables that are not in `surface` are
/// skipped.
pub fn merge_surface(
    prof: &mut Dataset,
    surface: &Dataset,
    config: &SurfaceConfig,
) -> Result<bool> {
    let start = prof
        .get("time")
        .ok_or_else(|| DeriveError::MissingVariable("time".to_owned()))?
        .at(0)
        .into_option()
        .ok_or(DeriveError::NotEnoughData)?;

    let times = surface
        .get("time")
        .ok_or_else(|| DeriveError::MissingVariable("time".to_owned()))?;
    let n_records = times.profile_len().unwrap_or(1);

    let nearest = (0..n_records)
        .filter_map(|i| times.at(i).into_option().map(|t| (i, (t - start).abs())))
        .fold(None, |acc: Option<(usize, f64)>, (i, dt)| match acc {
            Some((_, best)) if best <= dt => acc,
            _ => Some((i, dt)),
        });

    let (idx, dt) = match nearest {
        Some(nearest) => nearest,
        None => {
            warn!("no valid surface record times");
            return Ok(false);
        }
    };

    let tolerance = config.tolerance.num_milliseconds() as f64 / MILLIS_PER_DAY;
    if dt > tolerance {
        warn!(
            difference_hours = dt * 24.0,
            tolerance_hours = tolerance * 24.0,
            "no surface record close enough to the profile"
        );
        return Ok(false);
    }

    debug!(record = idx, difference_hours = dt * 24.0, "merging surface record");
    for &name in SURFACE_VARIABLES.iter() {
        if let Some(value) = surface.get(name) {
            if let (Some(n), Some(n_times)) = (value.profile_len(), times.profile_len()) {
                if n != n_times {
                    return Err(DeriveError::ShapeMismatch {
                        expected: n_times,
                        found: n,
                    });
                }
            }
            prof.insert(name, Value::Scalar(value.at(idx)));
        }
    }

    Ok(true)
}
