//! Conversions between wind speed and direction and wind components.
//!
//! Directions follow the meteorological convention: the direction the wind blows *from*, in
//! degrees clockwise from north.
use metfor::{MetersPSec, Quantity, WindSpdDir, WindUV};

/// Eastward and northward wind components from speed (m s-1) and direction (degrees).
#[inline]
pub fn components(wds: f64, wdd: f64) -> (f64, f64) {
    let WindUV { u, v } = WindUV::<MetersPSec>::from(WindSpdDir {
        speed: MetersPSec(wds),
        direction: wdd,
    });
    (u.unpack(), v.unpack())
}

/// Wind speed (m s-1) and direction (degrees in [0, 360)) from eastward and northward components.
#[inline]
pub fn speed_direction(ua: f64, va: f64) -> (f64, f64) {
    let WindSpdDir { speed, .. } = WindSpdDir::<MetersPSec>::from(WindUV {
        u: MetersPSec(ua),
        v: MetersPSec(va),
    });
    let direction = (-ua).atan2(-va).to_degrees().rem_euclid(360.0);
    (speed.unpack(), direction)
}
