//! The table of derivation rules.
//!
//! Every quantity the crate knows how to derive is the target of at least one [`Rule`]. The order
//! of [`RULES`] matters: when the resolver needs a variable it tries the rules producing it from
//! top to bottom and uses the first one whose sources are all available or derivable.
use std::fmt;

use crate::formulas::{self, Compute};

/// A single derivation: the variables produced, the variables consumed and the leaf function that
/// does the work.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Variables produced, in the order the leaf function returns them.
    pub targets: &'static [&'static str],
    /// Variables consumed, in call order.
    pub sources: &'static [&'static str],
    /// The leaf function.
    pub compute: Compute,
    /// Leaf function parameter names for each source, when they differ from the source names.
    pub params: Option<&'static [&'static str]>,
}

impl Rule {
    /// Does this rule produce `target`?
    #[inline]
    pub fn produces(&self, target: &str) -> bool {
        self.targets.iter().any(|t| *t == target)
    }

    /// Parameter name paired with each source name.
    pub fn bindings(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        let params = self.params.unwrap_or(self.sources);
        params.iter().copied().zip(self.sources.iter().copied())
    }

    /// Name used to identify the rule in logs and errors.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.targets.first().copied().unwrap_or("")
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("targets", &self.targets)
            .field("sources", &self.sources)
            .field("params", &self.params)
            .finish()
    }
}

const fn rule(
    targets: &'static [&'static str],
    sources: &'static [&'static str],
    compute: Compute,
) -> Rule {
    Rule {
        targets,
        sources,
        compute,
        params: None,
    }
}

const fn aliased(
    targets: &'static [&'static str],
    sources: &'static [&'static str],
    compute: Compute,
    params: &'static [&'static str],
) -> Rule {
    Rule {
        targets,
        sources,
        compute,
        params: Some(params),
    }
}

/// The built in derivations, in priority order.
///
/// Names ending in `s` (`ps`, `tas`, `ws`, ...) are near-surface scalars, which reuse the profile
/// formulas through parameter aliases.
pub static RULES: &[Rule] = &[
    rule(
        &["p_bvf", "zg_bvf", "bvf"],
        &["theta_v", "zg", "p", "g"],
        formulas::calc_bvf,
    ),
    rule(&["e"], &["w", "p"], formulas::calc_e),
    aliased(&["es"], &["ws", "ps"], formulas::calc_e, &["w", "p"]),
    rule(&["esat"], &["ta"], formulas::calc_esat),
    aliased(&["esats"], &["tas"], formulas::calc_esat, &["ta"]),
    aliased(&["g"], &["station_lat"], formulas::calc_g, &["lat"]),
    rule(&["gamma"], &["g"], formulas::calc_gamma),
    rule(&["gamma_sat"], &["p", "ta", "gamma"], formulas::calc_gamma_sat),
    rule(&["hur"], &["w", "wsat"], formulas::calc_hur),
    aliased(&["hurs"], &["ws", "wsats"], formulas::calc_hur, &["w", "wsat"]),
    rule(&["hus"], &["w"], formulas::calc_hus),
    aliased(&["huss"], &["ws"], formulas::calc_hus, &["w"]),
    rule(&["p_lcl"], &["ps", "ws", "tas"], formulas::calc_p_lcl),
    rule(&["p_ll"], &["ps", "ts", "p", "theta"], formulas::calc_p_ll),
    rule(&["rho"], &["p", "e", "ta"], formulas::calc_rho),
    aliased(&["rhos"], &["ps", "es", "tas"], formulas::calc_rho, &["p", "e", "ta"]),
    rule(&["rhod"], &["p", "e", "ta"], formulas::calc_rhod),
    aliased(&["rhods"], &["ps", "es", "tas"], formulas::calc_rhod, &["p", "e", "ta"]),
    rule(&["rhow"], &["e", "ta"], formulas::calc_rhow),
    aliased(&["rhows"], &["es", "tas"], formulas::calc_rhow, &["e", "ta"]),
    rule(&["ta_par"], &["p", "ps", "tas"], formulas::calc_ta_par),
    rule(
        &["ta_par_sat"],
        &["p", "tas", "ws", "g", "gamma"],
        formulas::calc_ta_par_sat,
    ),
    aliased(
        &["ta_surf_par"],
        &["p", "ps", "ts"],
        formulas::calc_ta_par,
        &["p", "ps", "tas"],
    ),
    aliased(
        &["ta_surf_par_sat"],
        &["p", "ts", "ws", "g", "gamma"],
        formulas::calc_ta_par_sat,
        &["p", "tas", "ws", "g", "gamma"],
    ),
    rule(&["td"], &["e"], formulas::calc_td),
    aliased(&["tds"], &["es"], formulas::calc_td, &["e"]),
    rule(&["tv"], &["ta", "w"], formulas::calc_tv),
    aliased(&["tvs"], &["tas", "ws"], formulas::calc_tv, &["ta", "w"]),
    rule(&["theta"], &["p", "ps", "ta"], formulas::calc_theta),
    aliased(&["theta_v"], &["theta", "w"], formulas::calc_tv, &["ta", "w"]),
    rule(&["ua"], &["wds", "wdd"], formulas::calc_ua),
    aliased(&["uas"], &["wdss", "wdds"], formulas::calc_ua, &["wds", "wdd"]),
    rule(&["va"], &["wds", "wdd"], formulas::calc_va),
    aliased(&["vas"], &["wdss", "wdds"], formulas::calc_va, &["wds", "wdd"]),
    rule(&["w"], &["hus"], formulas::calc_w),
    rule(&["w"], &["hur", "wsat"], formulas::calc_w),
    rule(&["wdd"], &["ua", "va"], formulas::calc_wdd),
    aliased(&["wdds"], &["uas", "vas"], formulas::calc_wdd, &["ua", "va"]),
    rule(&["wds"], &["ua", "va"], formulas::calc_wds),
    aliased(&["wdss"], &["uas", "vas"], formulas::calc_wds, &["ua", "va"]),
    aliased(&["ws"], &["huss"], formulas::calc_w, &["hus"]),
    aliased(&["ws"], &["hurs", "wsats"], formulas::calc_w, &["hur", "wsat"]),
    aliased(&["wsat"], &["p", "esat"], formulas::calc_w, &["p", "e"]),
    aliased(&["wsats"], &["ps", "esats"], formulas::calc_w, &["p", "e"]),
    rule(&["z"], &["zg", "g"], formulas::calc_z),
    rule(&["zg"], &["z", "g"], formulas::calc_zg),
    aliased(
        &["zg_lcl"],
        &["p_lcl", "p", "zg"],
        formulas::calc_zg,
        &["p1", "p", "zg"],
    ),
    aliased(
        &["zg_ll"],
        &["p_ll", "p", "zg"],
        formulas::calc_zg,
        &["p1", "p", "zg"],
    ),
];

/// Every variable produced by some rule, in table order, once for each time it is declared.
pub fn declared_targets(rules: &[Rule]) -> impl Iterator<Item = &'static str> + '_ {
    rules.iter().flat_map(|r| r.targets.iter().copied())
}
