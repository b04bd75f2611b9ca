//! Altitude and geopotential height.
use super::G0;

/// Altitude (m) from geopotential height (m) at gravitational acceleration `g`.
#[inline]
pub fn altitude(zg: f64, g: f64) -> f64 {
    zg / g * G0
}

/// Geopotential height (m) from altitude (m) at gravitational acceleration `g`.
#[inline]
pub fn geopotential_height(z: f64, g: f64) -> f64 {
    z * g / G0
}
