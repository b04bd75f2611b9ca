//! Create profiles from radiosonde points.
//!
//! A radiosonde reports a point every second or so while it drifts with the wind. [`prof`] bins
//! those points into pressure layers of fixed thickness, averages what falls in each layer and
//! derives the wind from how far and in which direction the balloon moved between layers.
//!
//! The points dataset uses the same names as the rest of the crate: `p` (Pa), `z` (m), `ta` (K),
//! `hur` (%), `lat` and `lon` (degrees), and `time` (days, see [`crate::surface::julian_date`]).
//! Only `p` is required.
use itertools::izip;
use optional::{none, Optioned};
use tracing::warn;

use crate::{
    dataset::{checked, Dataset, Value},
    error::{DeriveError, Result},
    keys::Direction,
};

/// Variables averaged onto the pressure layers.
pub const PROFILE_VARIABLES: [&str; 6] = ["z", "ta", "hur", "lat", "lon", "time"];

/// Mean radius of the Earth (m).
const EARTH_RADIUS: f64 = 6_371_008.8;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Most pressure layers a profile may have. Anything more comes from bad pressures.
const MAX_LEVELS: f64 = 100_000.0;

/// Options for turning points into a profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileConfig {
    /// Thickness of the pressure layers (Pa).
    pub resolution: f64,
    /// Which leg of the flight to use.
    pub direction: Direction,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        ProfileConfig {
            resolution: 500.0,
            direction: Direction::default(),
        }
    }
}

impl ProfileConfig {
    /// 500 Pa layers on the ascending leg.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the layer thickness in Pa.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Builder method to set the flight leg.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

/// Bin a points dataset into a profile on pressure layers.
///
/// The layer boundaries are multiples of the resolution enclosing all valid pressures, and the
/// output levels are the layer mid points ordered from high to low pressure. A point belongs to
/// a layer if its pressure is above the top boundary and at most the bottom boundary. Only points
/// moving in the requested direction are used: on the ascending leg a point is skipped if the
/// next point has a higher pressure, on the descending leg if it has a lower one. The last point
/// is always used.
///
/// Each variable is the mean of its valid values in the layer, missing if there are none. When
/// `lat`, `lon` and `time` are all available, `wdd` (degrees) and `wds` (m s-1) are derived from
/// the displacement between consecutive layers; the first layer has no wind.
///
/// # Examples
///
/// ```rust
/// use sonde_postprocess::{profile::{prof, ProfileConfig}, Dataset};
///
/// let pts = Dataset::new()
///     .with_variable("p", vec![100_100.0, 99_900.0, 99_600.0, 99_200.0])
///     .with_variable("ta", vec![290.0, 289.8, 289.6, 289.2]);
///
/// let profile = prof(&pts, &ProfileConfig::new()).unwrap();
///
/// let p = profile.get("p").unwrap().as_profile().unwrap();
/// assert_eq!(p.len(), 3);
/// assert_eq!(p[0].unpack(), 100_250.0);
///
/// let ta = profile.get("ta").unwrap().as_profile().unwrap();
/// assert_eq!(ta[0].unpack(), 290.0);
/// assert!((ta[1].unpack() - 289.7).abs() < 1.0e-9);
/// ```
pub fn prof(points: &Dataset, config: &ProfileConfig) -> Result<Dataset> {
    if !(config.resolution > 0.0) {
        return Err(DeriveError::InvalidArguments { function: "prof" });
    }

    let p = points
        .get("p")
        .ok_or_else(|| DeriveError::MissingVariable("p".to_owned()))?
        .as_profile()
        .ok_or(DeriveError::ExpectedProfile { name: "p" })?;

    let half_levels = half_levels(p, config.resolution)?;
    let keep = direction_mask(p, config.direction);
    let n = half_levels.len() - 1;

    let mut profile = Dataset::new().with_variable(
        "p",
        Value::Profile(
            half_levels
                .windows(2)
                .map(|pair| checked(0.5 * (pair[0] + pair[1])))
                .collect(),
        ),
    );

    for &name in PROFILE_VARIABLES.iter() {
        let vals = match points.get(name) {
            Some(value) => value
                .as_profile()
                .ok_or(DeriveError::ExpectedProfile { name })?,
            None => continue,
        };
        if vals.len() != p.len() {
            return Err(DeriveError::ShapeMismatch {
                expected: p.len(),
                found: vals.len(),
            });
        }

        let binned: Vec<Optioned<f64>> = (0..n)
            .map(|i| layer_mean(p, vals, &keep, half_levels[i], half_levels[i + 1]))
            .collect();
        profile.insert(name, Value::Profile(binned));
    }

    let wind = match (
        profile.get("lat").and_then(Value::as_profile),
        profile.get("lon").and_then(Value::as_profile),
        profile.get("time").and_then(Value::as_profile),
    ) {
        (Some(lat), Some(lon), Some(time)) => Some(drift_wind(lat, lon, time)),
        _ => None,
    };
    if let Some((wdd, wds)) = wind {
        profile.insert("wdd", Value::Profile(wdd));
        profile.insert("wds", Value::Profile(wds));
    }

    Ok(profile)
}

/// Layer boundaries from high to low pressure.
fn half_levels(p: &[Optioned<f64>], resolution: f64) -> Result<Vec<f64>> {
    let (p_min, p_max) = p
        .iter()
        .filter_map(|p| p.into_option())
        .fold(None, |acc: Option<(f64, f64)>, p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        })
        .ok_or(DeriveError::NotEnoughData)?;

    let bottom = p_max + resolution - p_max.rem_euclid(resolution);
    let top = p_min - p_min.rem_euclid(resolution);
    let n = ((bottom - top) / resolution).round();
    if !n.is_finite() || n < 0.0 || n > MAX_LEVELS {
        warn!(p_min, p_max, resolution, "pressure range too large to bin");
        return Err(DeriveError::NotEnoughData);
    }
    let n = n as usize;

    Ok((0..=n).map(|i| bottom - resolution * i as f64).collect())
}

/// Which points are on the requested leg of the flight.
fn direction_mask(p: &[Optioned<f64>], direction: Direction) -> Vec<bool> {
    let mut keep: Vec<bool> = p
        .windows(2)
        .map(|pair| match (pair[0].into_option(), pair[1].into_option()) {
            (Some(p0), Some(p1)) => match direction {
                Direction::Ascending => !(p1 > p0),
                Direction::Descending => !(p1 < p0),
            },
            _ => true,
        })
        .collect();
    keep.push(true);
    keep
}

fn layer_mean(
    p: &[Optioned<f64>],
    vals: &[Optioned<f64>],
    keep: &[bool],
    bottom: f64,
    top: f64,
) -> Optioned<f64> {
    let (sum, count) = izip!(p, vals, keep)
        .filter(|&(_, _, &keep)| keep)
        .filter_map(|(p, val, _)| p.into_option().map(|p| (p, *val)))
        // In the layer
        .filter(|&(p, _)| p > top && p <= bottom)
        .filter_map(|(_, val)| val.into_option())
        .fold((0.0, 0usize), |(sum, count), val| (sum + val, count + 1));

    if count == 0 {
        none()
    } else {
        checked(sum / count as f64)
    }
}

/// Wind from the drift of the balloon between consecutive levels.
fn drift_wind(
    lat: &[Optioned<f64>],
    lon: &[Optioned<f64>],
    time: &[Optioned<f64>],
) -> (Vec<Optioned<f64>>, Vec<Optioned<f64>>) {
    let n = lat.len();
    let mut wdd = vec![none(); n];
    let mut wds = vec![none(); n];

    for i in 1..n {
        let (lat0, lon0, t0, lat1, lon1, t1) = match (
            lat[i - 1].into_option(),
            lon[i - 1].into_option(),
            time[i - 1].into_option(),
            lat[i].into_option(),
            lon[i].into_option(),
            time[i].into_option(),
        ) {
            (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f)) => (a, b, c, d, e, f),
            _ => continue,
        };

        let dt = (t1 - t0) * SECONDS_PER_DAY;
        if dt == 0.0 {
            continue;
        }

        let (bearing, distance) = great_circle(lat0, lon0, lat1, lon1);
        // The balloon moves toward where the wind blows to.
        wdd[i] = checked((bearing + 180.0).rem_euclid(360.0));
        wds[i] = checked(distance / dt.abs());
    }

    (wdd, wds)
}

/// Initial bearing (degrees clockwise from north) and distance (m) from the first point to the
/// second on a sphere.
fn great_circle(lat0: f64, lon0: f64, lat1: f64, lon1: f64) -> (f64, f64) {
    let (phi0, phi1) = (lat0.to_radians(), lat1.to_radians());
    let d_phi = phi1 - phi0;
    let d_lambda = (lon1 - lon0).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi0.cos() * phi1.cos() * (d_lambda / 2.0).sin().powi(2);
    let distance = 2.0 * EARTH_RADIUS * a.sqrt().min(1.0).asin();

    let y = d_lambda.sin() * phi1.cos();
    let x = phi0.cos() * phi1.sin() - phi0.sin() * phi1.cos() * d_lambda.cos();
    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);

    (bearing, distance)
}
