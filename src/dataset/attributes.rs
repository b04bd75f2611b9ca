use std::collections::BTreeMap;

/// Descriptive attributes of a variable, carried alongside the data for writers of the on-disk
/// format. Derivation never reads or writes these.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    /// Human readable name.
    pub long_name: Option<String>,
    /// CF standard name.
    pub standard_name: Option<String>,
    /// Units string.
    pub units: Option<String>,
    /// Names of the dimensions, empty for scalars.
    pub dims: Vec<String>,
    /// Anything else, e.g. comments.
    pub extra: BTreeMap<String, String>,
}

impl Attributes {
    /// Create an empty set of attributes.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for the long name.
    #[inline]
    pub fn with_long_name<S: Into<String>>(mut self, name: S) -> Self {
        self.long_name = Some(name.into());
        self
    }

    /// Builder method for the standard name.
    #[inline]
    pub fn with_standard_name<S: Into<String>>(mut self, name: S) -> Self {
        self.standard_name = Some(name.into());
        self
    }

    /// Builder method for the units.
    #[inline]
    pub fn with_units<S: Into<String>>(mut self, units: S) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Builder method for the dimension names.
    #[inline]
    pub fn with_dims(mut self, dims: &[&str]) -> Self {
        self.dims = dims.iter().map(|d| (*d).to_owned()).collect();
        self
    }

    /// Builder method for an extra attribute.
    #[inline]
    pub fn with_extra<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}
