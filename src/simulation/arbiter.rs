//! Conflict resolution among matching rules
//!
//! Each candidate's utility is its noise-free utility plus logistic noise.
//! The best candidate fires; exact ties are broken uniformly at random; a
//! best utility below the threshold means nothing fires this cycle.

use rand::Rng;
use serde::Serialize;

use crate::core::config::UtilityConfig;
use crate::core::noise::{logistic, pick_max};
use crate::learning::UtilityTable;
use crate::rules::{Production, RuleId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub rule: RuleId,
    pub utility: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub winner: Option<Candidate>,
    pub candidates: Vec<Candidate>,
}

/// Pick the rule to fire from the matching set
pub fn select(
    matches: &[&Production],
    utilities: &UtilityTable,
    config: &UtilityConfig,
    rng: &mut impl Rng,
) -> Selection {
    let candidates: Vec<Candidate> = matches
        .iter()
        .map(|p| {
            let utility = utilities.current(p.id) + logistic(rng, config.noise);
            Candidate {
                rule: p.id,
                utility: if utility.is_nan() { f64::NEG_INFINITY } else { utility },
            }
        })
        .collect();

    let scores: Vec<f64> = candidates.iter().map(|c| c.utility).collect();
    let winner = pick_max(rng, &scores)
        .map(|i| candidates[i])
        .filter(|c| config.threshold.map_or(true, |t| c.utility >= t));

    if winner.is_none() && !candidates.is_empty() {
        tracing::trace!(candidates = candidates.len(), "no rule cleared the utility threshold");
    }

    Selection { winner, candidates }
}
