//! Data type and methods to store a set of named variables from a radiosonde flight.

use std::collections::HashMap;

pub use self::{attributes::Attributes, value::Value};

pub(crate) use self::value::checked;

/// A mutable collection of named variables.
///
/// Whether a variable is *present* is a different question from whether it holds valid data. The
/// derivation code only asks the first one, so a present variable full of missing values still
/// counts as available.
///
/// The dataset also carries per-variable attributes that are passed through untouched.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    vars: HashMap<String, Value>,
    attributes: HashMap<String, Attributes>,
}

impl Dataset {
    /// Create a new, empty dataset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sonde_postprocess::Dataset;
    ///
    /// let ds = Dataset::new();
    /// assert!(ds.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Dataset::default()
    }

    /// Builder method to add a variable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sonde_postprocess::{Dataset, Value};
    ///
    /// let ds = Dataset::new()
    ///     .with_variable("ps", 101_000.0)
    ///     .with_variable("p", vec![100_000.0, 90_000.0, 80_000.0])
    ///     .with_variable("station_lat", Value::undefined());
    ///
    /// assert_eq!(ds.len(), 3);
    /// assert!(ds.contains("station_lat"));
    /// assert!(ds.get("station_lat").unwrap().is_undefined());
    /// ```
    #[inline]
    pub fn with_variable<S, V>(mut self, name: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        self.insert(name, value);
        self
    }

    /// Set a variable, returning the previous value if there was one.
    #[inline]
    pub fn insert<S, V>(&mut self, name: S, value: V) -> Option<Value>
    where
        S: Into<String>,
        V: Into<Value>,
    {
        self.vars.insert(name.into(), value.into())
    }

    /// Get a variable.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Remove a variable. Its attributes are left alone.
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    /// Is the variable present, regardless of whether it holds valid data?
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Number of variables.
    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// True if there are no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over the variable names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(|k| k.as_str())
    }

    /// Iterate over the variables in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get the attributes of a variable.
    #[inline]
    pub fn attributes(&self, name: &str) -> Option<&Attributes> {
        self.attributes.get(name)
    }

    /// Set the attributes of a variable. The variable itself does not need to be present.
    #[inline]
    pub fn set_attributes<S: Into<String>>(&mut self, name: S, attrs: Attributes) {
        self.attributes.insert(name.into(), attrs);
    }
}

mod attributes;
mod value;
