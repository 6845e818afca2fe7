//! Motivation controller
//!
//! The budget lives in the goal record. A policy decides whether the agent
//! may still verify its retrieved rule and what a detected mismatch wipes
//! from working memory. Both models drive the same rule base.

use std::fmt::Debug;

use crate::core::config::MotivationConfig;
use crate::core::types::SimTime;
use crate::memory::{GoalState, Motivation, WmField};

/// Strategy seam between the rule base and a motivation model
pub trait MotivationPolicy: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Budget placed in a fresh goal record
    fn initial(&self) -> Motivation;

    /// Whether a check rule may fire if it commits at `now`
    fn is_check_eligible(&self, goal: &GoalState, now: SimTime) -> bool;

    /// Account for one fresh retrieval-then-verify attempt
    fn on_check_attempt(&self, goal: GoalState) -> GoalState;

    /// Working-memory fields cleared when a check detects a mismatch
    fn mismatch_reset(&self) -> &'static [WmField];

    /// Whether the cue side is kept in working memory
    fn records_cue(&self) -> bool;
}

/// Fixed number of retrieval attempts; checking stops when none are left
#[derive(Debug, Clone, Copy)]
pub struct CountMotivation {
    pub retries: u32,
}

impl MotivationPolicy for CountMotivation {
    fn name(&self) -> &'static str {
        "count"
    }

    fn initial(&self) -> Motivation {
        Motivation::Retries(self.retries)
    }

    fn is_check_eligible(&self, goal: &GoalState, _now: SimTime) -> bool {
        match goal.motivation {
            Motivation::Retries(left) => left > 0,
            Motivation::Deadline(_) => false,
        }
    }

    fn on_check_attempt(&self, mut goal: GoalState) -> GoalState {
        if let Motivation::Retries(left) = goal.motivation {
            goal.motivation = Motivation::Retries(left.saturating_sub(1));
        }
        goal
    }

    fn mismatch_reset(&self) -> &'static [WmField] {
        &[WmField::Value1]
    }

    fn records_cue(&self) -> bool {
        false
    }
}

/// Mental clock: checking is allowed until a deadline after trial onset
#[derive(Debug, Clone, Copy)]
pub struct ClockMotivation {
    pub seconds: f64,
}

impl MotivationPolicy for ClockMotivation {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn initial(&self) -> Motivation {
        Motivation::Deadline(self.seconds)
    }

    fn is_check_eligible(&self, goal: &GoalState, now: SimTime) -> bool {
        match goal.motivation {
            Motivation::Deadline(limit) => goal.elapsed(now) < limit,
            Motivation::Retries(_) => false,
        }
    }

    fn on_check_attempt(&self, goal: GoalState) -> GoalState {
        goal
    }

    fn mismatch_reset(&self) -> &'static [WmField] {
        &[WmField::Value1, WmField::Value2]
    }

    fn records_cue(&self) -> bool {
        true
    }
}

/// Build the policy for a validated config
pub fn policy_for(config: &MotivationConfig) -> Box<dyn MotivationPolicy> {
    match *config {
        MotivationConfig::Count { retries } => Box::new(CountMotivation {
            retries: u32::try_from(retries).unwrap_or(u32::MAX).max(1),
        }),
        MotivationConfig::Clock { seconds } => Box::new(ClockMotivation { seconds }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Step;

    #[test]
    fn test_count_with_one_retry_never_checks() {
        let policy = CountMotivation { retries: 1 };
        let goal = GoalState::new(policy.initial(), 0.0);
        let goal = policy.on_check_attempt(goal);
        assert_eq!(goal.motivation, Motivation::Retries(0));
        assert!(!policy.is_check_eligible(&goal, 0.0));
    }

    #[test]
    fn test_count_decrements_by_one() {
        let policy = CountMotivation { retries: 3 };
        let mut goal = GoalState::new(policy.initial(), 0.0);
        let mut eligible = 0;
        for _ in 0..5 {
            goal = policy.on_check_attempt(goal);
            if policy.is_check_eligible(&goal, 0.0) {
                eligible += 1;
            }
        }
        // Three attempts leave room for two checks, and the budget floors at zero
        assert_eq!(eligible, 2);
        assert_eq!(goal.motivation, Motivation::Retries(0));
    }

    #[test]
    fn test_clock_deadline_is_strict() {
        let policy = ClockMotivation { seconds: 1.0 };
        let goal = GoalState::new(policy.initial(), 2.0);
        assert!(policy.is_check_eligible(&goal, 2.999));
        assert!(!policy.is_check_eligible(&goal, 3.0));
        let after = policy.on_check_attempt(goal.clone());
        assert_eq!(after, goal);
    }

    // The count model keeps value2 across a correction; the clock model does not.
    #[test]
    fn test_reset_asymmetry() {
        let count = CountMotivation { retries: 2 };
        let clock = ClockMotivation { seconds: 1.0 };
        assert_eq!(count.mismatch_reset(), &[WmField::Value1]);
        assert_eq!(clock.mismatch_reset(), &[WmField::Value1, WmField::Value2]);
        assert!(!count.records_cue());
        assert!(clock.records_cue());
    }

    #[test]
    fn test_policy_for_config() {
        let policy = policy_for(&MotivationConfig::Clock { seconds: 0.8 });
        assert_eq!(policy.name(), "clock");
        let goal = GoalState::new(policy.initial(), 0.0);
        assert_eq!(goal.step, Step::AttendFixation);
        assert_eq!(goal.motivation, Motivation::Deadline(0.8));
    }
}
