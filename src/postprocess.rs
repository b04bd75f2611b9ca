//! Derive everything derivable.
//!
//! [`postprocess`] hands every target declared in the rule table to the resolver, one after
//! another, and ignores the ones that cannot be produced. Gravity depends on the station latitude,
//! so when that is unknown a fallback latitude is put in place for the pass and taken out again
//! afterwards.
use tracing::{debug, info, trace};

use crate::{
    dataset::{Dataset, Value},
    error::Result,
    keys::OverwritePolicy,
    resolver::Resolver,
    rules::{declared_targets, Rule, RULES},
};

/// Name of the station latitude variable that gravity is derived from.
pub const STATION_LATITUDE: &str = "station_lat";

/// Latitude (degrees) used for gravity when the station latitude is unknown.
pub const DEFAULT_FALLBACK_LATITUDE: f64 = 45.0;

/// Options for a postprocessing pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostprocessConfig {
    /// What to do with declared targets that are already present.
    pub overwrite: OverwritePolicy,
    /// Station latitude (degrees) assumed while the real one is unknown.
    pub fallback_latitude: f64,
    /// Remember names proven unresolvable for the rest of the pass.
    pub memoize_failures: bool,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        PostprocessConfig {
            overwrite: OverwritePolicy::default(),
            fallback_latitude: DEFAULT_FALLBACK_LATITUDE,
            memoize_failures: false,
        }
    }
}

impl PostprocessConfig {
    /// The defaults: recompute every target, 45 degree fallback latitude, no failure memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the overwrite policy.
    pub fn with_overwrite(mut self, overwrite: OverwritePolicy) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Builder method to set the fallback latitude in degrees.
    pub fn with_fallback_latitude(mut self, lat: f64) -> Self {
        self.fallback_latitude = lat;
        self
    }

    /// Builder method to turn the failure memo on or off.
    pub fn with_failure_memo(mut self, memoize: bool) -> Self {
        self.memoize_failures = memoize;
        self
    }
}

/// The station latitude as found before the pass, so it can be put back afterwards.
#[derive(Debug)]
enum Latitude {
    Known,
    Undefined(Value),
    Absent,
}

impl Latitude {
    fn install_fallback(dataset: &mut Dataset, fallback: f64) -> Self {
        let state = match dataset.get(STATION_LATITUDE) {
            Some(lat) if !lat.is_undefined() => return Latitude::Known,
            Some(lat) => Latitude::Undefined(lat.clone()),
            None => Latitude::Absent,
        };

        debug!(fallback, previous = ?state, "using fallback station latitude");
        dataset.insert(STATION_LATITUDE, fallback);
        state
    }

    fn restore(self, dataset: &mut Dataset) {
        match self {
            Latitude::Known => {}
            Latitude::Undefined(original) => {
                debug!("restoring undefined station latitude");
                dataset.insert(STATION_LATITUDE, original);
            }
            Latitude::Absent => {
                debug!("removing fallback station latitude");
                dataset.remove(STATION_LATITUDE);
            }
        }
    }
}

/// Compute every derivable variable with the built in rules and the default configuration.
///
/// Variables that cannot be derived from what is available are left out. Errors only come from
/// contract violations between the rules and the leaf functions, or from inconsistent profile
/// lengths in the input.
///
/// # Examples
///
/// ```rust
/// use sonde_postprocess::{postprocess, Dataset, Value};
///
/// let mut ds = Dataset::new()
///     .with_variable("p", vec![100_000.0, 92_500.0, 85_000.0])
///     .with_variable("ta", vec![293.0, 289.0, 285.0])
///     .with_variable("hus", vec![0.010, 0.008, 0.006])
///     .with_variable("zg", vec![110.0, 780.0, 1_500.0]);
///
/// postprocess(&mut ds).unwrap();
///
/// assert!(ds.contains("hur"));
/// assert!(ds.contains("td"));
/// assert!(ds.contains("z"));
/// assert!(!ds.contains("station_lat"));
/// ```
pub fn postprocess(dataset: &mut Dataset) -> Result<()> {
    postprocess_with(dataset, &PostprocessConfig::default(), RULES)
}

/// Compute every derivable variable with a custom configuration and rule table.
///
/// The station latitude is restored to its original state even when an error is returned.
pub fn postprocess_with(
    dataset: &mut Dataset,
    config: &PostprocessConfig,
    rules: &[Rule],
) -> Result<()> {
    let before = dataset.len();

    let latitude = Latitude::install_fallback(dataset, config.fallback_latitude);
    let result = derive_all(dataset, config, rules);
    latitude.restore(dataset);

    info!(
        before,
        after = dataset.len(),
        ok = result.is_ok(),
        "postprocess finished"
    );
    result
}

fn derive_all(dataset: &mut Dataset, config: &PostprocessConfig, rules: &[Rule]) -> Result<()> {
    let mut resolver = Resolver::new(rules);
    if config.memoize_failures {
        resolver = resolver.with_failure_memo();
    }

    for target in declared_targets(rules) {
        if config.overwrite == OverwritePolicy::PreserveExisting && dataset.contains(target) {
            trace!(variable = target, "already present");
            continue;
        }

        // Not being able to derive a target is fine, just move on.
        resolver.resolve(dataset, target)?;
    }

    Ok(())
}
