//! Per-trial firing and reward log

use serde::Serialize;

use crate::core::types::SimTime;
use crate::learning::{CreditRecord, PendingCredit, RewardEvent};
use crate::memory::{ChunkActivation, Motivation};
use crate::rules::RuleId;

/// One rule firing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceRecord {
    pub rule: RuleId,
    pub selected_at: SimTime,
    pub fired_at: SimTime,
    /// Noisy utility the rule won with
    pub utility: f64,
}

/// One reward and how it was credited
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardRecord {
    pub event: RewardEvent,
    pub credits: Vec<CreditRecord>,
}

/// Everything recorded while a trial runs
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrialLog {
    pub onset: SimTime,
    /// When the goal first entered attend-stimulus
    pub stimulus_onset: Option<SimTime>,
    pub firings: Vec<TraceRecord>,
    pub rewards: Vec<RewardRecord>,
    pub corrections: u32,
    pub retrieval_failures: u32,
    pub checked_by: Option<RuleId>,
    /// Motivation left when the goal was last seen
    pub final_motivation: Option<Motivation>,
    pub activations: Vec<ChunkActivation>,
    pub cycles: u32,
    #[serde(skip)]
    pub pending_credit: Vec<PendingCredit>,
}

impl TrialLog {
    pub fn new(onset: SimTime) -> Self {
        Self {
            onset,
            ..Default::default()
        }
    }

    /// Firings of one rule
    pub fn firings_of(&self, rule: RuleId) -> impl Iterator<Item = &TraceRecord> {
        self.firings.iter().filter(move |f| f.rule == rule)
    }

    pub fn count(&self, rule: RuleId) -> usize {
        self.firings_of(rule).count()
    }

    pub fn fired(&self, rule: RuleId) -> bool {
        self.count(rule) > 0
    }

    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().map(|r| r.event.magnitude).sum()
    }

    /// Firings of the four encoding rules
    pub fn competitive_firings(&self) -> impl Iterator<Item = &TraceRecord> {
        self.firings.iter().filter(|f| f.rule.is_competitive())
    }
}
