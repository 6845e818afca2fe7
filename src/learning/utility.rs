//! Rule utilities and reward-driven utility learning
//!
//! A reward is shared by every rule that fired since the previous reward.
//! Each rule sees the reward minus the time since it fired, so rules closer
//! to the outcome receive more credit:
//!
//! ```text
//! U_i <- U_i + alpha * ((R - (t_reward - t_fired_i)) - U_i)
//! ```

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::config::UtilityConfig;
use crate::core::types::SimTime;
use crate::rules::RuleId;

/// A rule firing awaiting credit assignment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PendingCredit {
    pub rule: RuleId,
    pub fired_at: SimTime,
}

/// How much of one reward a rule received
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditRecord {
    pub rule: RuleId,
    pub received: f64,
    pub utility_before: f64,
    pub utility_after: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UtilityTable {
    base: BTreeMap<RuleId, f64>,
    learned: BTreeMap<RuleId, f64>,
    learning_rate: f64,
    enabled: bool,
}

impl UtilityTable {
    /// Names were checked by config validation; unknown ones are skipped
    pub fn new(config: &UtilityConfig) -> Self {
        let base = config
            .base
            .iter()
            .filter_map(|(name, value)| RuleId::from_name(name).map(|id| (id, *value)))
            .collect();
        Self {
            base,
            learned: BTreeMap::new(),
            learning_rate: config.learning_rate,
            enabled: config.learning,
        }
    }

    pub fn base(&self, rule: RuleId) -> f64 {
        self.base.get(&rule).copied().unwrap_or(0.0)
    }

    pub fn learned(&self, rule: RuleId) -> f64 {
        self.learned.get(&rule).copied().unwrap_or(0.0)
    }

    /// Noise-free utility: base plus learned adjustment
    pub fn current(&self, rule: RuleId) -> f64 {
        self.base(rule) + self.learned(rule)
    }

    /// Distribute one reward over the rules fired since the last one
    pub fn apply_reward(
        &mut self,
        reward: f64,
        at: SimTime,
        fired: &[PendingCredit],
    ) -> Vec<CreditRecord> {
        let mut records = Vec::with_capacity(fired.len());
        for firing in fired {
            let received = reward - (at - firing.fired_at);
            let before = self.current(firing.rule);
            if self.enabled {
                let delta = self.learning_rate * (received - before);
                *self.learned.entry(firing.rule).or_insert(0.0) += delta;
            }
            records.push(CreditRecord {
                rule: firing.rule,
                received,
                utility_before: before,
                utility_after: self.current(firing.rule),
            });
        }
        records
    }

    /// Current utilities of the four encoding rules
    pub fn competitive_snapshot(&self) -> Vec<(RuleId, f64)> {
        RuleId::COMPETITIVE
            .iter()
            .map(|r| (*r, self.current(*r)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> UtilityTable {
        let mut config = UtilityConfig::default();
        config.base.insert("process-shape".into(), 1.0);
        config.learning_rate = 0.5;
        UtilityTable::new(&config)
    }

    #[test]
    fn test_base_utilities() {
        let t = table();
        assert_eq!(t.current(RuleId::ProcessShape), 1.0);
        assert_eq!(t.current(RuleId::ProcessLocation), 0.0);
    }

    #[test]
    fn test_recent_rules_get_more_credit() {
        let mut t = table();
        let fired = [
            PendingCredit { rule: RuleId::ProcessLocation, fired_at: 0.2 },
            PendingCredit { rule: RuleId::RetrieveRule, fired_at: 0.5 },
        ];
        let records = t.apply_reward(1.0, 0.6, &fired);
        assert!(records[1].received > records[0].received);
        assert!((records[0].received - 0.6).abs() < 1e-12);
        // 0 + 0.5 * (0.6 - 0) = 0.3
        assert!((t.learned(RuleId::ProcessLocation) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_negative_reward_lowers_utility() {
        let mut t = table();
        t.apply_reward(-0.1, 0.4, &[PendingCredit { rule: RuleId::ProcessShape, fired_at: 0.1 }]);
        assert!(t.current(RuleId::ProcessShape) < 1.0);
    }

    #[test]
    fn test_disabled_learning_keeps_utilities() {
        let mut config = UtilityConfig::default();
        config.learning = false;
        let mut t = UtilityTable::new(&config);
        let records =
            t.apply_reward(5.0, 1.0, &[PendingCredit { rule: RuleId::DontCheck, fired_at: 0.9 }]);
        assert_eq!(t.current(RuleId::DontCheck), 0.0);
        assert_eq!(records[0].utility_before, records[0].utility_after);
    }
}
