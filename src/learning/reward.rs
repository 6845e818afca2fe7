//! Reward dispatch on designated rule firings

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::config::RewardConfig;
use crate::core::types::SimTime;
use crate::rules::RuleId;

/// Default reward for a successful verification
pub const CHECK_PASS_REWARD: f64 = 0.1;

/// Default penalty for a detected mismatch
pub const DETECT_PROBLEM_REWARD: f64 = -0.1;

/// Default penalty for a failed retrieval
pub const RETRIEVAL_FAILURE_REWARD: f64 = -0.1;

/// A signed feedback signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RewardEvent {
    pub rule: RuleId,
    pub magnitude: f64,
    pub time: SimTime,
}

#[derive(Debug, Clone)]
pub struct RewardDispatcher {
    table: BTreeMap<RuleId, f64>,
    time_coupled: bool,
}

impl RewardDispatcher {
    pub fn new(config: &RewardConfig) -> Self {
        let table = config
            .table
            .iter()
            .filter_map(|(name, value)| RuleId::from_name(name).map(|id| (id, *value)))
            .filter(|(id, _)| id.is_reward_site())
            .collect();
        Self {
            table,
            time_coupled: config.time_coupled,
        }
    }

    /// Reward for `rule` firing at `now` in a trial that began at `onset`
    ///
    /// Time-coupled check rewards take precedence over the table; rules
    /// outside the four reward sites never produce a reward.
    pub fn dispatch(&self, rule: RuleId, onset: SimTime, now: SimTime) -> Option<RewardEvent> {
        if !rule.is_reward_site() {
            return None;
        }
        let magnitude = if self.time_coupled && rule == RuleId::CheckPass {
            Some(now - onset)
        } else if let Some(value) = self.table.get(&rule) {
            Some(*value)
        } else {
            match rule {
                RuleId::CheckPass => Some(CHECK_PASS_REWARD),
                RuleId::CheckDetectProblem => Some(DETECT_PROBLEM_REWARD),
                RuleId::RetrievalFailure => Some(RETRIEVAL_FAILURE_REWARD),
                _ => None,
            }
        };
        magnitude.map(|magnitude| RewardEvent {
            rule,
            magnitude,
            time: now,
        })
    }
}
