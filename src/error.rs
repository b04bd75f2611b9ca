//! Error types for the sonde-postprocess crate.
use thiserror::Error;

/// Error type for the crate.
///
/// A variable that simply cannot be derived from the available data is *not* an error, the
/// resolver reports it as unresolved and leaves it out of the dataset. These variants describe
/// contract violations between the rule table, the leaf functions and the data handed to them.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum DeriveError {
    /// A leaf function was called with a combination of arguments it does not recognize.
    #[error("Invalid arguments for {function}.")]
    InvalidArguments {
        /// Name of the leaf function.
        function: &'static str,
    },
    /// An argument that must be a single value was given a profile.
    #[error("Argument {name} must be a scalar.")]
    ExpectedScalar {
        /// Parameter name of the offending argument.
        name: &'static str,
    },
    /// An argument that must be a profile was given a single value.
    #[error("Argument {name} must be a profile.")]
    ExpectedProfile {
        /// Parameter name of the offending argument.
        name: &'static str,
    },
    /// Profiles combined element by element have different lengths.
    #[error("Profile length mismatch, expected {expected} but found {found}.")]
    ShapeMismatch {
        /// Length of the first profile seen.
        expected: usize,
        /// Length of the profile that did not match.
        found: usize,
    },
    /// A rule's leaf function returned a different number of values than the rule has targets.
    #[error("Rule for {rule} produced {found} values, expected {expected}.")]
    OutputArity {
        /// First target of the rule.
        rule: &'static str,
        /// Number of declared targets.
        expected: usize,
        /// Number of values returned.
        found: usize,
    },
    /// A variable required by a collaborator (profile binning, surface merge) is missing.
    #[error("Missing variable {0}.")]
    MissingVariable(String),
    /// Not enough data available for the calculation.
    #[error("Not enough data available.")]
    NotEnoughData,
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, DeriveError>;
