use itertools::{izip, Itertools};
use optional::Optioned;

use crate::dataset::checked;

/// Interpolate values given two parallel vectors of data and a target value.
///
/// Assumes that xs is monotonic, increasing or decreasing. Points where either value is missing
/// are skipped. Returns a missing value if `target_x` is outside the range of `xs`.
///
/// # Examples
///
/// ```rust
/// use optional::some;
/// use sonde_postprocess::linear_interpolate;
///
/// let p = vec![some(100_000.0), some(90_000.0), some(80_000.0)];
/// let z = vec![some(0.0), some(1_000.0), some(2_000.0)];
///
/// assert_eq!(linear_interpolate(&p, &z, 85_000.0).unpack(), 1_500.0);
/// assert!(linear_interpolate(&p, &z, 70_000.0).is_none());
/// ```
#[inline]
pub fn linear_interpolate(
    xs: &[Optioned<f64>],
    ys: &[Optioned<f64>],
    target_x: f64,
) -> Optioned<f64> {
    debug_assert_eq!(xs.len(), ys.len());

    enum BracketType {
        Bracket((f64, f64), (f64, f64)),
        EndEqual((f64, f64)),
    }

    if target_x.is_nan() {
        return Optioned::default();
    }

    let make_bracket = |pnt_0: (f64, f64), pnt_1: (f64, f64)| -> Option<BracketType> {
        let (x0, _) = pnt_0;
        let (x1, _) = pnt_1;

        if (x0 < target_x && x1 > target_x) || (x0 > target_x && x1 < target_x) {
            Some(BracketType::Bracket(pnt_0, pnt_1))
        } else if (x0 - target_x).abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_0))
        } else if (x1 - target_x).abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_1))
        } else {
            None
        }
    };

    let value_opt = izip!(xs, ys)
        // Skip over points with a missing value and use the points on either side of them.
        .filter(|(x, y)| x.is_some() && y.is_some())
        .map(|(x, y)| (x.unpack(), y.unpack()))
        // Look at them in pairs.
        .tuple_windows::<(_, _)>()
        // Only keep pairs that bracket the target value
        .filter_map(|(pnt_0, pnt_1)| make_bracket(pnt_0, pnt_1))
        // The first one wins
        .next()
        .map(|val| match val {
            BracketType::Bracket((x0, y0), (x1, y1)) => linear_interp(target_x, x0, x1, y0, y1),
            BracketType::EndEqual(pnt) => pnt.1,
        });

    match value_opt {
        Some(val) => checked(val),
        None => Optioned::default(),
    }
}

#[inline]
pub(crate) fn linear_interp(x_val: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    debug_assert_ne!(x1, x2);

    let run = x2 - x1;
    let rise = y2 - y1;
    let dx = x_val - x1;

    y1 + dx * (rise / run)
}
