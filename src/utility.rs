//! Numerical helpers shared by the leaf functions.

/// Bisection algorithm for finding the root of an equation given values bracketing a root. Used
/// for the condensation level, where there is no closed form.
///
/// Returns `None` if the values do not bracket a root or either end evaluates to a missing value.
pub(crate) fn find_root(
    f: &dyn Fn(f64) -> f64,
    mut low_val: f64,
    mut high_val: f64,
) -> Option<f64> {
    const MAX_IT: usize = 60;
    const EPS: f64 = 1.0e-10;

    if low_val > high_val {
        ::std::mem::swap(&mut low_val, &mut high_val);
    }

    let mut f_low = f(low_val);
    let f_high = f(high_val);

    if f_low.is_nan() || f_high.is_nan() {
        return None;
    }
    if f_low == 0.0 {
        return Some(low_val);
    }
    if f_high == 0.0 {
        return Some(high_val);
    }
    if f_low * f_high > 0.0 {
        return None;
    }

    let mut mid_val = (high_val - low_val) / 2.0 + low_val;
    let mut f_mid = f(mid_val);
    for _ in 0..MAX_IT {
        if f_mid * f_low > 0.0 {
            low_val = mid_val;
            f_low = f_mid;
        } else {
            high_val = mid_val;
        }

        if (high_val - low_val).abs() < EPS {
            break;
        }

        mid_val = (high_val - low_val) / 2.0 + low_val;
        f_mid = f(mid_val);
    }

    Some(mid_val)
}
