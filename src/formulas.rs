//! Leaf functions: the physical formulas invoked by the derivation rules.
//!
//! Each `calc_*` function takes its inputs as named arguments (see [`Args`]) and returns one value
//! per output, in a fixed order. Scalars are broadcast against profiles and a missing element in
//! any input gives a missing element in the output, so invalid data propagates instead of
//! failing. Calling a leaf function with a set of argument names it does not recognize is a bug in
//! the rule table and returns [`DeriveError::InvalidArguments`].
//!
//! The plain `f64` formulas live in the submodules, in SI units.
use optional::{none, Optioned};
use smallvec::{smallvec, SmallVec};

use crate::{
    dataset::{checked, Value},
    error::{DeriveError, Result},
    interpolation::linear_interpolate,
};

pub mod height;
pub mod humidity;
pub mod stability;
pub mod temperature;
pub mod wind;

/// Gas constant for dry air (J kg-1 K-1).
pub const RD: f64 = 287.058;
/// Specific heat capacity of dry air at constant pressure at 273 K (J kg-1 K-1).
pub const CP: f64 = 1006.0;
/// Ratio of the gas constants of dry air and water vapor.
pub const EPSILON: f64 = 0.622;
/// Gas constant for water vapor (J kg-1 K-1).
pub const RV: f64 = RD / EPSILON;
/// Latent heat of vaporization at 0C (J kg-1).
pub const LV: f64 = 2.501e6;
/// Globally averaged acceleration of gravity at sea level (m s-2).
pub const G0: f64 = 9.806_65;
/// Poisson constant, Rd / cp.
pub const KAPPA: f64 = RD / CP;

/// Vertical resolution (m) of the Brunt-Väisälä frequency grid.
pub const BVF_RESOLUTION: f64 = 400.0;

/// The values returned by a leaf function, one per output.
pub type Outputs = SmallVec<[Value; 3]>;

/// Signature shared by all leaf functions.
pub type Compute = fn(&Args<'_>) -> Result<Outputs>;

type Bound<'a> = SmallVec<[&'a Value; 6]>;

/// Named arguments for a leaf function: parameter names bound to dataset values.
#[derive(Clone, Debug, Default)]
pub struct Args<'a> {
    bound: SmallVec<[(&'static str, &'a Value); 6]>,
}

impl<'a> Args<'a> {
    /// No arguments bound.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to bind a parameter name to a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sonde_postprocess::{formulas::{calc_hus, Args}, Value};
    ///
    /// let w = Value::scalar(0.01);
    /// let hus = calc_hus(&Args::new().with("w", &w)).unwrap();
    /// assert!((hus[0].as_scalar().unwrap() - 0.01 / 1.01).abs() < 1.0e-12);
    /// ```
    #[inline]
    pub fn with(mut self, name: &'static str, value: &'a Value) -> Self {
        self.bind(name, value);
        self
    }

    /// Bind a parameter name to a value.
    #[inline]
    pub fn bind(&mut self, name: &'static str, value: &'a Value) {
        self.bound.push((name, value));
    }

    /// Look up a bound argument.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.bound
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// True if exactly these names, and no others, are bound.
    pub fn binds(&self, names: &[&str]) -> bool {
        self.bound.len() == names.len() && names.iter().all(|n| self.get(n).is_some())
    }

    /// Fetch exactly these arguments, in this order, or fail with `InvalidArguments`.
    fn take(&self, function: &'static str, names: &[&'static str]) -> Result<Bound<'a>> {
        if !self.binds(names) {
            return Err(DeriveError::InvalidArguments { function });
        }

        names
            .iter()
            .map(|n| self.get(n).ok_or(DeriveError::InvalidArguments { function }))
            .collect()
    }
}

/*--------------------------------------------------------------------------------------------------
                                       Argument helpers
--------------------------------------------------------------------------------------------------*/
fn single(value: Value) -> Result<Outputs> {
    Ok(smallvec![value])
}

fn scalar_of(value: &Value, name: &'static str) -> Result<Optioned<f64>> {
    match value {
        Value::Scalar(val) => Ok(*val),
        Value::Profile(_) => Err(DeriveError::ExpectedScalar { name }),
    }
}

fn profile_of<'a>(value: &'a Value, name: &'static str) -> Result<&'a [Optioned<f64>]> {
    value
        .as_profile()
        .ok_or(DeriveError::ExpectedProfile { name })
}

fn same_length(profiles: &[&[Optioned<f64>]]) -> Result<usize> {
    let expected = profiles.first().map(|p| p.len()).unwrap_or(0);
    match profiles.iter().find(|p| p.len() != expected) {
        Some(p) => Err(DeriveError::ShapeMismatch {
            expected,
            found: p.len(),
        }),
        None => Ok(expected),
    }
}

#[inline]
fn raw(val: Optioned<f64>) -> f64 {
    val.into_option().unwrap_or(std::f64::NAN)
}

/// Apply `f` element by element, broadcasting scalars against profiles.
///
/// The result is a scalar if every input is a scalar. Any missing input element gives a missing
/// output element without calling `f`.
fn elementwise<F>(values: &[&Value], f: F) -> Result<Value>
where
    F: Fn(&[f64]) -> f64,
{
    let mut len: Option<usize> = None;
    for n in values.iter().filter_map(|v| v.profile_len()) {
        match len {
            None => len = Some(n),
            Some(expected) if expected != n => {
                return Err(DeriveError::ShapeMismatch { expected, found: n })
            }
            Some(_) => {}
        }
    }

    let eval = |idx: usize| -> Optioned<f64> {
        let mut xs: SmallVec<[f64; 6]> = SmallVec::new();
        for v in values {
            match v.at(idx).into_option() {
                Some(x) => xs.push(x),
                None => return none(),
            }
        }
        checked(f(xs.as_slice()))
    };

    Ok(match len {
        None => Value::Scalar(eval(0)),
        Some(n) => Value::Profile((0..n).map(eval).collect()),
    })
}

/// Interpolate `ys` to the level(s) `p1` along the pressure profile `p`.
fn interpolate_at(p1: &Value, p: &Value, ys: &Value, ys_name: &'static str) -> Result<Value> {
    let xs = profile_of(p, "p")?;
    let ys = profile_of(ys, ys_name)?;
    same_length(&[xs, ys])?;

    let at = |level: Optioned<f64>| match level.into_option() {
        Some(level) => linear_interpolate(xs, ys, level),
        None => none(),
    };

    Ok(match p1 {
        Value::Scalar(level) => Value::Scalar(at(*level)),
        Value::Profile(levels) => Value::Profile(levels.iter().map(|l| at(*l)).collect()),
    })
}

/*--------------------------------------------------------------------------------------------------
                                       Leaf functions
--------------------------------------------------------------------------------------------------*/
/// Brunt-Väisälä frequency from `theta_v`, `zg`, `p` and scalar `g`.
///
/// Returns the layer pressures, layer geopotential heights and frequencies, in that order.
pub fn calc_bvf(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_bvf", &["theta_v", "zg", "p", "g"])?;
    let theta_v = profile_of(v[0], "theta_v")?;
    let zg = profile_of(v[1], "zg")?;
    let p = profile_of(v[2], "p")?;
    let g = raw(scalar_of(v[3], "g")?);
    same_length(&[theta_v, zg, p])?;

    let bvf = stability::brunt_vaisala(theta_v, zg, p, g, BVF_RESOLUTION);
    Ok(smallvec![
        Value::Profile(bvf.pressure),
        Value::Profile(bvf.height),
        Value::Profile(bvf.frequency),
    ])
}

/// Water vapor partial pressure from `p` and `w`.
pub fn calc_e(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_e", &["p", "w"])?;
    single(elementwise(&v, |x| humidity::vapor_pressure(x[0], x[1]))?)
}

/// Saturation water vapor partial pressure from `ta`.
pub fn calc_esat(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_esat", &["ta"])?;
    single(elementwise(&v, |x| humidity::saturation_vapor_pressure(x[0]))?)
}

/// Gravitational acceleration from `lat`.
pub fn calc_g(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_g", &["lat"])?;
    single(elementwise(&v, |x| stability::gravity(x[0]))?)
}

/// Dry adiabatic lapse rate from `g`.
pub fn calc_gamma(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_gamma", &["g"])?;
    single(elementwise(&v, |x| stability::dry_lapse_rate(x[0]))?)
}

/// Saturated adiabatic lapse rate from `p`, `ta` and `gamma`.
pub fn calc_gamma_sat(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_gamma_sat", &["p", "ta", "gamma"])?;
    single(elementwise(&v, |x| {
        stability::saturated_lapse_rate(x[0], x[1], x[2])
    })?)
}

/// Relative humidity from `w` and `wsat`.
pub fn calc_hur(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_hur", &["w", "wsat"])?;
    single(elementwise(&v, |x| humidity::relative_humidity(x[0], x[1]))?)
}

/// Specific humidity from `w`.
pub fn calc_hus(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_hus", &["w"])?;
    single(elementwise(&v, |x| humidity::specific_humidity(x[0]))?)
}

/// Lifting condensation level pressure from `ps`, `ws` and `tas`.
pub fn calc_p_lcl(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_p_lcl", &["ps", "ws", "tas"])?;
    single(elementwise(&v, |x| {
        temperature::lifting_condensation_pressure(x[0], x[1], x[2])
    })?)
}

/// Lifting level pressure from scalar `ps` and `ts` and the `p` and `theta` profiles.
pub fn calc_p_ll(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_p_ll", &["ps", "ts", "p", "theta"])?;
    let ps = scalar_of(v[0], "ps")?;
    let ts = scalar_of(v[1], "ts")?;
    let p = profile_of(v[2], "p")?;
    let theta = profile_of(v[3], "theta")?;
    same_length(&[p, theta])?;

    let level = match (ps.into_option(), ts.into_option()) {
        (Some(ps), Some(ts)) => checked(temperature::lifting_level_pressure(ps, ts, p, theta)),
        _ => none(),
    };
    single(Value::Scalar(level))
}

/// Moist air density from `p`, `e` and `ta`.
pub fn calc_rho(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_rho", &["p", "e", "ta"])?;
    single(elementwise(&v, |x| humidity::air_density(x[0], x[1], x[2]))?)
}

/// Dry air density from `p`, `e` and `ta`.
pub fn calc_rhod(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_rhod", &["p", "e", "ta"])?;
    single(elementwise(&v, |x| humidity::dry_air_density(x[0], x[1], x[2]))?)
}

/// Water vapor density from `e` and `ta`.
pub fn calc_rhow(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_rhow", &["e", "ta"])?;
    single(elementwise(&v, |x| humidity::water_vapor_density(x[0], x[1]))?)
}

/// Dry adiabatic parcel temperature at `p` for a parcel starting at `ps` and `tas`.
pub fn calc_ta_par(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_ta_par", &["p", "ps", "tas"])?;
    single(elementwise(&v, |x| {
        temperature::dry_parcel_temperature(x[0], x[1], x[2])
    })?)
}

/// Saturation parcel temperature profile along `p` for a parcel starting at `tas` with mixing
/// ratio `ws`, given scalar `g` and `gamma`.
pub fn calc_ta_par_sat(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_ta_par_sat", &["p", "tas", "ws", "g", "gamma"])?;
    let p = profile_of(v[0], "p")?;
    let tas = scalar_of(v[1], "tas")?;
    let ws = scalar_of(v[2], "ws")?;
    let g = scalar_of(v[3], "g")?;
    let gamma = scalar_of(v[4], "gamma")?;

    let profile = match (
        tas.into_option(),
        ws.into_option(),
        g.into_option(),
        gamma.into_option(),
    ) {
        (Some(tas), Some(ws), Some(g), Some(gamma)) => {
            temperature::saturated_parcel_profile(p, tas, ws, g, gamma)
        }
        _ => vec![none(); p.len()],
    };
    single(Value::Profile(profile))
}

/// Dew point temperature from `e`.
pub fn calc_td(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_td", &["e"])?;
    single(elementwise(&v, |x| humidity::dew_point(x[0]))?)
}

/// Virtual temperature from `ta` and `w`.
pub fn calc_tv(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_tv", &["ta", "w"])?;
    single(elementwise(&v, |x| temperature::virtual_temperature(x[0], x[1]))?)
}

/// Potential temperature from `p`, reference pressure `ps` and `ta`.
pub fn calc_theta(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_theta", &["p", "ps", "ta"])?;
    single(elementwise(&v, |x| {
        temperature::potential_temperature(x[0], x[1], x[2])
    })?)
}

/// Eastward wind from `wds` and `wdd`.
pub fn calc_ua(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_ua", &["wds", "wdd"])?;
    single(elementwise(&v, |x| wind::components(x[0], x[1]).0)?)
}

/// Northward wind from `wds` and `wdd`.
pub fn calc_va(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_va", &["wds", "wdd"])?;
    single(elementwise(&v, |x| wind::components(x[0], x[1]).1)?)
}

/// Wind direction from `ua` and `va`.
pub fn calc_wdd(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_wdd", &["ua", "va"])?;
    single(elementwise(&v, |x| wind::speed_direction(x[0], x[1]).1)?)
}

/// Wind speed from `ua` and `va`.
pub fn calc_wds(args: &Args) -> Result<Outputs> {
    let v = args.take("calc_wds", &["ua", "va"])?;
    single(elementwise(&v, |x| wind::speed_direction(x[0], x[1]).0)?)
}

/// Humidity mixing ratio from one of:
///   - `p` and `e`,
///   - `hus`,
///   - `hur` and `wsat`.
pub fn calc_w(args: &Args) -> Result<Outputs> {
    const NAME: &str = "calc_w";

    if args.binds(&["p", "e"]) {
        let v = args.take(NAME, &["p", "e"])?;
        single(elementwise(&v, |x| {
            humidity::mixing_ratio_from_vapor_pressure(x[0], x[1])
        })?)
    } else if args.binds(&["hus"]) {
        let v = args.take(NAME, &["hus"])?;
        single(elementwise(&v, |x| {
            humidity::mixing_ratio_from_specific_humidity(x[0])
        })?)
    } else if args.binds(&["hur", "wsat"]) {
        let v = args.take(NAME, &["hur", "wsat"])?;
        single(elementwise(&v, |x| {
            humidity::mixing_ratio_from_relative_humidity(x[0], x[1])
        })?)
    } else {
        Err(DeriveError::InvalidArguments { function: NAME })
    }
}

/// Altitude from one of:
///   - `zg` and `g`,
///   - interpolation of the `z` profile to the pressure `p1` along the `p` profile.
pub fn calc_z(args: &Args) -> Result<Outputs> {
    const NAME: &str = "calc_z";

    if args.binds(&["zg", "g"]) {
        let v = args.take(NAME, &["zg", "g"])?;
        single(elementwise(&v, |x| height::altitude(x[0], x[1]))?)
    } else if args.binds(&["p1", "p", "z"]) {
        let v = args.take(NAME, &["p1", "p", "z"])?;
        single(interpolate_at(v[0], v[1], v[2], "z")?)
    } else {
        Err(DeriveError::InvalidArguments { function: NAME })
    }
}

/// Geopotential height from one of:
///   - `z` and `g`,
///   - interpolation of the `zg` profile to the pressure `p1` along the `p` profile.
pub fn calc_zg(args: &Args) -> Result<Outputs> {
    const NAME: &str = "calc_zg";

    if args.binds(&["z", "g"]) {
        let v = args.take(NAME, &["z", "g"])?;
        single(elementwise(&v, |x| height::geopotential_height(x[0], x[1]))?)
    } else if args.binds(&["p1", "p", "zg"]) {
        let v = args.take(NAME, &["p1", "p", "zg"])?;
        single(interpolate_at(v[0], v[1], v[2], "zg")?)
    } else {
        Err(DeriveError::InvalidArguments { function: NAME })
    }
}
