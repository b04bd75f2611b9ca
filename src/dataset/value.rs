use optional::{none, some, Optioned};

/// The value of a single variable in a dataset.
///
/// Invalid elements are stored as missing values in the `Optioned` type, which uses NaN as its
/// marker for `f64`. A not-a-number result from a formula and a masked element are therefore the
/// same thing, and a fully valid sequence is just a profile without missing elements.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A single number, e.g. surface pressure or station latitude.
    Scalar(Optioned<f64>),
    /// A sequence of numbers along the profile dimension.
    Profile(Vec<Optioned<f64>>),
}

/// Wrap a raw number, mapping NaN to a missing value.
#[inline]
pub(crate) fn checked(val: f64) -> Optioned<f64> {
    if val.is_nan() {
        none()
    } else {
        some(val)
    }
}

impl Value {
    /// Create a scalar value. NaN becomes a missing value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sonde_postprocess::Value;
    ///
    /// assert_eq!(Value::scalar(101_325.0).as_scalar(), Some(101_325.0));
    /// assert!(Value::scalar(std::f64::NAN).is_undefined());
    /// ```
    #[inline]
    pub fn scalar(val: f64) -> Self {
        Value::Scalar(checked(val))
    }

    /// A scalar with no valid value.
    #[inline]
    pub fn undefined() -> Self {
        Value::Scalar(none())
    }

    /// Create a profile from raw numbers. NaN elements become missing values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sonde_postprocess::Value;
    ///
    /// let p = Value::profile(vec![100_000.0, std::f64::NAN, 85_000.0]);
    /// assert_eq!(p.profile_len(), Some(3));
    /// assert!(p.at(1).is_none());
    /// ```
    pub fn profile<I>(vals: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Value::Profile(vals.into_iter().map(checked).collect())
    }

    /// Is this a single value?
    #[inline]
    pub fn is_scalar(&self) -> bool {
        match self {
            Value::Scalar(_) => true,
            Value::Profile(_) => false,
        }
    }

    /// Number of elements if this is a profile.
    #[inline]
    pub fn profile_len(&self) -> Option<usize> {
        match self {
            Value::Scalar(_) => None,
            Value::Profile(vals) => Some(vals.len()),
        }
    }

    /// The scalar value, if this is a scalar holding a valid number.
    #[inline]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(val) => val.into_option(),
            Value::Profile(_) => None,
        }
    }

    /// The elements, if this is a profile.
    #[inline]
    pub fn as_profile(&self) -> Option<&[Optioned<f64>]> {
        match self {
            Value::Scalar(_) => None,
            Value::Profile(vals) => Some(vals),
        }
    }

    /// Element `idx`, broadcasting scalars. Out of range indexes are missing.
    #[inline]
    pub fn at(&self, idx: usize) -> Optioned<f64> {
        match self {
            Value::Scalar(val) => *val,
            Value::Profile(vals) => vals.get(idx).copied().unwrap_or_default(),
        }
    }

    /// True when no element holds a valid number. The variable may still be present in a
    /// dataset; presence and validity are different things.
    pub fn is_undefined(&self) -> bool {
        match self {
            Value::Scalar(val) => val.is_none(),
            Value::Profile(vals) => vals.iter().all(|v| v.is_none()),
        }
    }

    /// Iterate over the valid numbers only.
    pub fn valid_values<'a>(&'a self) -> Box<dyn Iterator<Item = f64> + 'a> {
        match self {
            Value::Scalar(val) => Box::new(val.into_option().into_iter()),
            Value::Profile(vals) => Box::new(vals.iter().filter_map(|v| v.into_option())),
        }
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(val: f64) -> Self {
        Value::scalar(val)
    }
}

impl From<Optioned<f64>> for Value {
    #[inline]
    fn from(val: Optioned<f64>) -> Self {
        Value::Scalar(val)
    }
}

impl From<Vec<f64>> for Value {
    #[inline]
    fn from(vals: Vec<f64>) -> Self {
        Value::profile(vals)
    }
}

impl From<Vec<Optioned<f64>>> for Value {
    #[inline]
    fn from(vals: Vec<Optioned<f64>>) -> Self {
        Value::Profile(vals)
    }
}
