//! Gravity, lapse rates and static stability.
use itertools::Itertools;
use optional::Optioned;

use super::{humidity::saturation_mixing_ratio, CP, EPSILON, LV, RD};
use crate::{dataset::checked, interpolation::linear_interpolate};

/// Most layers a Brunt-Väisälä grid may have. Anything more comes from bad heights.
const MAX_BVF_LAYERS: f64 = 10_000.0;

/// Gravitational acceleration (m s-2) at mean sea level for a latitude in degrees. Height
/// dependence is ignored.
#[inline]
pub fn gravity(lat: f64) -> f64 {
    let phi = lat.to_radians();
    9.780_327 * (1.0 + 0.005_302_4 * phi.sin().powi(2) - 0.000_005_8 * (2.0 * phi).sin().powi(2))
}

/// Dry adiabatic lapse rate (K m-1) at gravitational acceleration `g`.
#[inline]
pub fn dry_lapse_rate(g: f64) -> f64 {
    g / CP
}

/// Saturated adiabatic lapse rate (K m-1) at pressure `p` and temperature `ta`, given the dry
/// lapse rate `gamma`.
#[inline]
pub fn saturated_lapse_rate(p: f64, ta: f64, gamma: f64) -> f64 {
    let wsat = saturation_mixing_ratio(p, ta);
    gamma * (1.0 + LV * wsat / (RD * ta))
        / (1.0 + LV.powi(2) * wsat * EPSILON / (RD * CP * ta.powi(2)))
}

/// Brunt-Väisälä frequency on a regular geopotential height grid.
#[derive(Clone, Debug, Default)]
pub struct BruntVaisala {
    /// Pressure at the middle of each layer.
    pub pressure: Vec<Optioned<f64>>,
    /// Geopotential height at the middle of each layer.
    pub height: Vec<Optioned<f64>>,
    /// Signed frequency (s-1), negative where the layer is statically unstable.
    pub frequency: Vec<Optioned<f64>>,
}

/// Calculate the Brunt-Väisälä frequency from virtual potential temperature, geopotential height
/// and pressure profiles.
///
/// The profiles are resampled onto layers `resolution` meters thick spanning the valid heights,
/// and the frequency is evaluated from the virtual potential temperature gradient across each
/// layer. Layers reaching past the top of the data come back missing. If the heights span more
/// than `MAX_BVF_LAYERS` layers, or the span is not finite, the result is empty.
pub fn brunt_vaisala(
    theta_v: &[Optioned<f64>],
    zg: &[Optioned<f64>],
    p: &[Optioned<f64>],
    g: f64,
    resolution: f64,
) -> BruntVaisala {
    let (zg_min, zg_max) = match zg
        .iter()
        .filter_map(|z| z.into_option())
        .minmax()
        .into_option()
    {
        Some(bounds) => bounds,
        None => return BruntVaisala::default(),
    };

    let n_half = ((zg_max + resolution - zg_min) / resolution).ceil();
    if !n_half.is_finite() || n_half < 0.0 || n_half > MAX_BVF_LAYERS + 1.0 {
        return BruntVaisala::default();
    }
    let n_half = n_half as usize;
    let zg_half: Vec<f64> = (0..n_half)
        .map(|i| zg_min + resolution * i as f64)
        .collect();

    let half_levels: Vec<(f64, Optioned<f64>, Optioned<f64>)> = zg_half
        .iter()
        .map(|&z| (z, linear_interpolate(zg, theta_v, z), linear_interpolate(zg, p, z)))
        .collect();

    let mut result = BruntVaisala::default();
    for ((z0, th0, p0), (z1, th1, p1)) in half_levels.into_iter().tuple_windows() {
        result.height.push(checked((z0 + z1) * 0.5));
        result.pressure.push(mid_point(p0, p1));

        let freq = match (th0.into_option(), th1.into_option()) {
            (Some(th0), Some(th1)) => {
                let theta_v_full = (th0 + th1) * 0.5;
                let bvf2 = g * (th1 - th0) / (z1 - z0) / theta_v_full;
                checked(bvf2.abs().sqrt() * bvf2.signum())
            }
            _ => Optioned::default(),
        };
        result.frequency.push(freq);
    }

    result
}

#[inline]
fn mid_point(a: Optioned<f64>, b: Optioned<f64>) -> Optioned<f64> {
    match (a.into_option(), b.into_option()) {
        (Some(a), Some(b)) => checked((a + b) * 0.5),
        _ => Optioned::default(),
    }
}
