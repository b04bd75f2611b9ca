//! Humidity conversions.
//!
//! Pressures in Pa, temperatures in K, mixing ratios and specific humidity in kg/kg, relative
//! humidity in percent.
use metfor::{Celsius, Kelvin, Quantity};

use super::{EPSILON, RD, RV};

/// Water vapor partial pressure from pressure and humidity mixing ratio.
#[inline]
pub fn vapor_pressure(p: f64, w: f64) -> f64 {
    w * p / (EPSILON + w)
}

/// Saturation water vapor partial pressure over liquid water (Magnus formula).
#[inline]
pub fn saturation_vapor_pressure(ta: f64) -> f64 {
    let Celsius(tc) = Celsius::from(Kelvin(ta));
    611.2 * (17.67 * tc / (tc + 243.5)).exp()
}

/// Dew point temperature from vapor pressure, the inverse of `saturation_vapor_pressure`.
///
/// The dew point of a non-positive vapor pressure is undefined and comes back as NaN.
#[inline]
pub fn dew_point(e: f64) -> f64 {
    if !(e > 0.0) {
        return std::f64::NAN;
    }

    let ln_ratio = (e / 611.2).ln();
    let tc = 243.5 * ln_ratio / (17.67 - ln_ratio);
    Kelvin::from(Celsius(tc)).unpack()
}

/// Humidity mixing ratio from pressure and water vapor partial pressure.
#[inline]
pub fn mixing_ratio_from_vapor_pressure(p: f64, e: f64) -> f64 {
    EPSILON * e / (p - e)
}

/// Humidity mixing ratio from specific humidity.
#[inline]
pub fn mixing_ratio_from_specific_humidity(hus: f64) -> f64 {
    hus / (1.0 - hus)
}

/// Humidity mixing ratio from relative humidity and the saturation mixing ratio.
#[inline]
pub fn mixing_ratio_from_relative_humidity(hur: f64, wsat: f64) -> f64 {
    hur / 100.0 * wsat
}

/// Saturation humidity mixing ratio at the given pressure and temperature.
#[inline]
pub fn saturation_mixing_ratio(p: f64, ta: f64) -> f64 {
    mixing_ratio_from_vapor_pressure(p, saturation_vapor_pressure(ta))
}

/// Relative humidity from the mixing ratio and saturation mixing ratio.
#[inline]
pub fn relative_humidity(w: f64, wsat: f64) -> f64 {
    100.0 * w / wsat
}

/// Specific humidity from the mixing ratio.
#[inline]
pub fn specific_humidity(w: f64) -> f64 {
    w / (1.0 + w)
}

/// Density of dry air (kg m-3) from pressure, vapor pressure and temperature.
#[inline]
pub fn dry_air_density(p: f64, e: f64, ta: f64) -> f64 {
    (p - e) / (RD * ta)
}

/// Density of water vapor (kg m-3) from vapor pressure and temperature.
#[inline]
pub fn water_vapor_density(e: f64, ta: f64) -> f64 {
    e / (RV * ta)
}

/// Density of moist air (kg m-3), the sum of the dry air and water vapor densities.
#[inline]
pub fn air_density(p: f64, e: f64, ta: f64) -> f64 {
    dry_air_density(p, e, ta) + water_vapor_density(e, ta)
}
