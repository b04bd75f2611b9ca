//! Demand driven resolution of derived variables.
//!
//! Asking for a variable scans the rule table in order. A rule applies when every one of its
//! sources is already in the dataset or can itself be resolved, recursively. The first rule that
//! applies is evaluated and all of its targets are written to the dataset. A variable that cannot
//! be produced is not an error; the dataset is simply left without it.
use std::collections::HashSet;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    dataset::Dataset,
    error::{DeriveError, Result},
    formulas::Args,
    rules::{Rule, RULES},
};

/// Names currently being resolved on the call stack, outermost first.
type Chain<'t> = SmallVec<[&'t str; 8]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Resolved,
    /// `cycle_cut` is set when some source was rejected only because it was already being resolved
    /// further up the call stack. Such a failure depends on the chain and is not remembered.
    Unresolved { cycle_cut: bool },
}

/// Resolves variables against a rule table.
///
/// By default failed resolutions are not remembered, so a later request may retry, and fail, the
/// same sub-chain again. [`Resolver::with_failure_memo`] turns on a memo of names proven
/// unresolvable that lives as long as the resolver.
#[derive(Debug)]
pub struct Resolver<'r> {
    rules: &'r [Rule],
    unresolvable: Option<HashSet<String>>,
}

impl<'r> Resolver<'r> {
    /// Create a resolver for a rule table.
    pub fn new(rules: &'r [Rule]) -> Self {
        Resolver {
            rules,
            unresolvable: None,
        }
    }

    /// Builder method to remember names that could not be resolved.
    ///
    /// Only failures that did not involve a cycle cut are remembered, those are the ones that do
    /// not depend on what else was being resolved at the time. Do not share a resolver with a memo
    /// between datasets.
    pub fn with_failure_memo(mut self) -> Self {
        self.unresolvable = Some(HashSet::new());
        self
    }

    /// The rule table this resolver works from.
    #[inline]
    pub fn rules(&self) -> &'r [Rule] {
        self.rules
    }

    /// Make `target` available in `dataset`, deriving it and whatever it depends on.
    ///
    /// Returns `Ok(false)` if no rule can produce it from the available data. The target itself is
    /// not checked for presence; if a rule applies it is recomputed. Errors are contract
    /// violations between the rule table and the leaf functions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sonde_postprocess::{Dataset, Resolver, RULES};
    ///
    /// let mut ds = Dataset::new()
    ///     .with_variable("hus", 0.008)
    ///     .with_variable("ta", 293.15)
    ///     .with_variable("p", 100_000.0);
    ///
    /// let mut resolver = Resolver::new(RULES);
    /// assert!(resolver.resolve(&mut ds, "hur").unwrap());
    /// assert!(ds.contains("w"));
    /// assert!(ds.contains("wsat"));
    ///
    /// let mut ds = Dataset::new().with_variable("hus", 0.008);
    /// assert!(!resolver.resolve(&mut ds, "hur").unwrap());
    /// assert!(!ds.contains("hur"));
    /// ```
    pub fn resolve(&mut self, dataset: &mut Dataset, target: &str) -> Result<bool> {
        self.resolve_chained(dataset, target, &[])
    }

    /// Same as [`Resolver::resolve`], with the names in `chain` treated as already being resolved
    /// further up the call stack.
    pub fn resolve_chained<'t>(
        &mut self,
        dataset: &mut Dataset,
        target: &'t str,
        chain: &[&'t str],
    ) -> Result<bool> {
        let chain: Chain<'t> = chain.iter().copied().collect();
        let outcome = self.resolve_in(dataset, target, &chain)?;
        Ok(outcome == Outcome::Resolved)
    }

    fn resolve_in<'t>(
        &mut self,
        dataset: &mut Dataset,
        target: &'t str,
        chain: &Chain<'t>,
    ) -> Result<Outcome> {
        if self.is_known_unresolvable(target) {
            trace!(variable = target, "known unresolvable");
            return Ok(Outcome::Unresolved { cycle_cut: false });
        }

        let rules = self.rules;
        let mut cycle_cut = false;

        'rules: for rule in rules.iter().filter(|r| r.produces(target)) {
            trace!(variable = target, rule = rule.name(), sources = ?rule.sources, "trying rule");

            for &source in rule.sources {
                if dataset.contains(source) {
                    continue;
                }

                if chain.contains(&source) {
                    trace!(variable = target, source, "cycle cut");
                    cycle_cut = true;
                    continue 'rules;
                }

                let mut next = chain.clone();
                next.push(target);
                match self.resolve_in(dataset, source, &next)? {
                    Outcome::Resolved => {}
                    Outcome::Unresolved { cycle_cut: cut } => {
                        cycle_cut |= cut;
                        continue 'rules;
                    }
                }
            }

            apply(rule, dataset)?;
            return Ok(Outcome::Resolved);
        }

        if !cycle_cut {
            if let Some(memo) = self.unresolvable.as_mut() {
                memo.insert(target.to_owned());
            }
        }

        trace!(variable = target, cycle_cut, "unresolved");
        Ok(Outcome::Unresolved { cycle_cut })
    }

    #[inline]
    fn is_known_unresolvable(&self, target: &str) -> bool {
        self.unresolvable
            .as_ref()
            .map(|memo| memo.contains(target))
            .unwrap_or(false)
    }
}

/// Evaluate a rule whose sources are all present and write every target.
///
/// Nothing is written unless the leaf function succeeds and returns one value per target.
fn apply(rule: &Rule, dataset: &mut Dataset) -> Result<()> {
    let outputs = {
        let mut args = Args::new();
        for (param, source) in rule.bindings() {
            let value = dataset
                .get(source)
                .ok_or_else(|| DeriveError::MissingVariable(source.to_owned()))?;
            args.bind(param, value);
        }
        (rule.compute)(&args)?
    };

    if outputs.len() != rule.targets.len() {
        return Err(DeriveError::OutputArity {
            rule: rule.name(),
            expected: rule.targets.len(),
            found: outputs.len(),
        });
    }

    debug!(targets = ?rule.targets, sources = ?rule.sources, "rule applied");
    for (&target, value) in rule.targets.iter().zip(outputs) {
        dataset.insert(target, value);
    }

    Ok(())
}

/// Resolve `target` with the built in rule table.
///
/// `chain` holds the names already being resolved, and is empty for a top level request. Failures
/// are not remembered between calls.
pub fn resolve(dataset: &mut Dataset, target: &str, chain: &[&str]) -> Result<bool> {
    Resolver::new(RULES).resolve_chained(dataset, target, chain)
}
