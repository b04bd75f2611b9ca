#![warn(missing_docs)]
//! Derived physical quantities for radiosonde profiles.
//!
//! A radiosonde measures a handful of variables, typically pressure, temperature, humidity and
//! position. Many more can be calculated from those: mixing ratio, dew point, wind components,
//! potential temperature, parcel temperatures, condensation levels, static stability and so on.
//! This crate keeps a table of [`Rule`]s describing how each quantity is derived from others, and
//! a [`Resolver`] that works out, on demand, which chain of rules produces a requested variable
//! from the data at hand.
//!
//! [`postprocess`] runs the resolver for every variable the table knows about and leaves the
//! dataset with everything that could be derived. Variables that cannot be derived are simply
//! absent.
//!
//! ```rust
//! use sonde_postprocess::{postprocess, Dataset};
//!
//! let mut ds = Dataset::new()
//!     .with_variable("p", vec![100_000.0, 85_000.0, 70_000.0])
//!     .with_variable("ta", vec![293.0, 284.0, 275.0])
//!     .with_variable("hur", vec![70.0, 60.0, 40.0])
//!     .with_variable("ps", 100_500.0)
//!     .with_variable("tas", 294.0);
//!
//! postprocess(&mut ds).unwrap();
//!
//! for name in &["w", "td", "theta", "ta_par", "esats"] {
//!     assert!(ds.contains(name), "{}", name);
//! }
//! // Nothing to get the winds from
//! assert!(!ds.contains("ua"));
//! ```
//!
//! Profiles can be built from raw radiosonde points with [`profile::prof`], and near-surface
//! observations merged in with [`surface::merge_surface`].

//
// API
//
pub use crate::{
    dataset::{Attributes, Dataset, Value},
    error::{DeriveError, Result},
    interpolation::linear_interpolate,
    keys::{Direction, OverwritePolicy},
    postprocess::{postprocess, postprocess_with, PostprocessConfig, STATION_LATITUDE},
    resolver::{resolve, Resolver},
    rules::{Rule, RULES},
};

pub mod formulas;
pub mod headers;
pub mod profile;
pub mod rules;
pub mod surface;

//
// Internal use only
//

// Modules
mod dataset;
mod error;
mod interpolation;
mod keys;
mod postprocess;
mod resolver;
mod utility;
