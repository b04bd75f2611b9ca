//! Potential, virtual and parcel temperatures.
use optional::Optioned;

use super::{
    humidity::saturation_mixing_ratio, stability::saturated_lapse_rate, EPSILON, KAPPA, RD,
};
use crate::{dataset::checked, interpolation::linear_interpolate, utility::find_root};

/// Lowest pressure (Pa) searched for a lifting condensation level.
const LCL_SEARCH_TOP: f64 = 1_000.0;

/// Potential temperature relative to the reference pressure `ps`.
#[inline]
pub fn potential_temperature(p: f64, ps: f64, ta: f64) -> f64 {
    ta * (ps / p).powf(KAPPA)
}

/// Virtual temperature from temperature and humidity mixing ratio.
#[inline]
pub fn virtual_temperature(ta: f64, w: f64) -> f64 {
    ta * (1.0 + w / EPSILON) / (1.0 + w)
}

/// Temperature of a parcel lifted dry adiabatically from (`ps`, `tas`) to `p`.
#[inline]
pub fn dry_parcel_temperature(p: f64, ps: f64, tas: f64) -> f64 {
    tas * (p / ps).powf(KAPPA)
}

/// Pressure of the lifting condensation level for a surface parcel.
///
/// This is the pressure at which a parcel lifted dry adiabatically from the surface becomes
/// saturated with its surface mixing ratio `ws`. A parcel that is already saturated at the surface
/// condenses at `ps`. If no level is found the result is NaN.
pub fn lifting_condensation_pressure(ps: f64, ws: f64, tas: f64) -> f64 {
    let excess = |p: f64| saturation_mixing_ratio(p, dry_parcel_temperature(p, ps, tas)) - ws;

    if excess(ps) <= 0.0 {
        return ps;
    }

    find_root(&excess, LCL_SEARCH_TOP, ps).unwrap_or(std::f64::NAN)
}

/// Pressure of the lowest level where the potential temperature reaches the surface temperature
/// `ts`, capped at the surface pressure `ps`.
///
/// This is how high a parcel heated to the surface temperature rises dry adiabatically. If the
/// surface is colder than the whole `theta` profile the parcel stays at the surface, if it is
/// warmer than the whole profile the result is NaN.
pub fn lifting_level_pressure(
    ps: f64,
    ts: f64,
    p: &[Optioned<f64>],
    theta: &[Optioned<f64>],
) -> f64 {
    if let Some(level) = linear_interpolate(theta, p, ts).into_option() {
        return level.min(ps);
    }

    let coldest = theta
        .iter()
        .filter_map(|t| t.into_option())
        .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.min(t))));

    match coldest {
        Some(coldest) if ts <= coldest => ps,
        _ => std::f64::NAN,
    }
}

/// Temperature profile of a parcel lifted from the first level of `p`.
///
/// The parcel starts at `tas` with mixing ratio `ws` and cools at the dry lapse rate `gamma` until
/// it is saturated, then at the saturated lapse rate. Levels with a missing pressure are skipped.
/// `p` has to be dense enough for the integration to be accurate.
pub fn saturated_parcel_profile(
    p: &[Optioned<f64>],
    tas: f64,
    ws: f64,
    g: f64,
    gamma: f64,
) -> Vec<Optioned<f64>> {
    let mut profile = Vec::with_capacity(p.len());
    let mut last: Option<(f64, f64)> = None;

    for p_opt in p {
        let p = match p_opt.into_option() {
            Some(p) => p,
            None => {
                profile.push(Optioned::default());
                continue;
            }
        };

        let ta = match last {
            None => tas,
            Some((p0, ta0)) => {
                let gamma1 = if ws < saturation_mixing_ratio(p0, ta0) {
                    gamma
                } else {
                    saturated_lapse_rate(p, ta0, gamma)
                };
                let dta_dp = RD * ta0 / (p * g) * gamma1;
                ta0 + dta_dp * (p - p0)
            }
        };

        profile.push(checked(ta));
        last = Some((p, ta));
    }

    profile
}
