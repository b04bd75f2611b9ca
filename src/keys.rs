//! Enums used as keys for setting options in functions.
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// What the orchestrator does with a declared target that is already in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum OverwritePolicy {
    /// Hand every declared target to the resolver. The first applicable rule recomputes the
    /// value and replaces whatever was there, measured or not.
    Recompute,
    /// Skip declared targets that are already present, so measured values are never replaced.
    PreserveExisting,
}

impl Default for OverwritePolicy {
    fn default() -> Self {
        OverwritePolicy::Recompute
    }
}

/// Which leg of a radiosonde flight to turn into a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    /// Points where pressure is decreasing, the balloon is rising.
    Ascending,
    /// Points where pressure is increasing, after burst.
    Descending,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Ascending
    }
}
