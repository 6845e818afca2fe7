//! Condition evaluation against the current records

use crate::core::types::SimTime;
use crate::motivation::MotivationPolicy;
use crate::rules::{Condition, Production};
use crate::simulation::context::SimulationContext;

/// Context provided to condition evaluation
pub struct MatchContext<'a> {
    pub ctx: &'a SimulationContext,
    pub policy: &'a dyn MotivationPolicy,
    /// When a rule selected now would commit its effects
    pub commit_time: SimTime,
}

/// Evaluate one condition
pub fn condition_holds(condition: &Condition, mc: &MatchContext) -> bool {
    let ctx = mc.ctx;
    let wm = ctx.working_memory.read();
    let percept = ctx.visual.read();
    let retrieved = ctx.retrieval.read();
    let goal = ctx.goal.read();

    match *condition {
        Condition::Step(step) => goal.map_or(false, |g| g.step == step),
        Condition::Screen(kind) => ctx.screen.kind() == kind,
        Condition::Attended(kind) => percept.map_or(false, |p| p.source == kind),
        Condition::NotAttended(kind) => percept.map_or(true, |p| p.source != kind),
        Condition::Free(record) => !ctx.record_state(record).busy,
        Condition::Empty(record) => ctx.record_state(record).empty,
        Condition::Full(record) => ctx.record_state(record).full,
        Condition::Failed(record) => ctx.record_state(record).failed,
        Condition::Holds(dimension) => wm.map_or(false, |n| n.holds(dimension)),
        Condition::Lacks(dimension) => wm.map_or(false, |n| !n.holds(dimension)),
        Condition::OpenSlot => wm.map_or(false, |n| n.open_slot().is_some()),
        Condition::WmState(state) => wm.map_or(false, |n| n.state == state),
        Condition::Checked => wm.map_or(false, |n| n.checked),
        Condition::CheckEligible => {
            goal.map_or(false, |g| mc.policy.is_check_eligible(g, mc.commit_time))
        }
        Condition::CheckIneligible => {
            goal.map_or(false, |g| !mc.policy.is_check_eligible(g, mc.commit_time))
        }
        Condition::ShapeMatchesPercept => match (retrieved, percept.and_then(|p| p.shape)) {
            (Some(rule), Some(shape)) => rule.shape == shape,
            _ => false,
        },
        Condition::ShapeDiffersFromPercept => match (retrieved, percept.and_then(|p| p.shape)) {
            (Some(rule), Some(shape)) => rule.shape != shape,
            _ => false,
        },
        Condition::HasMotorResponse => retrieved.map_or(false, |r| r.has_motor_response()),
    }
}

/// All rules whose conditions hold, in rule-base order
pub fn matching_rules<'r>(rules: &'r [Production], mc: &MatchContext) -> Vec<&'r Production> {
    rules
        .iter()
        .filter(|p| p.conditions.iter().all(|c| condition_holds(c, mc)))
        .collect()
}
