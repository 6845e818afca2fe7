//! Action execution: binding templates at selection, applying effects at firing

use crate::core::config::TimingConfig;
use crate::core::error::Result;
use crate::core::types::{Dimension, SimTime, Step};
use crate::memory::{Encoding, MotorCommand, RetrievalCue, WmField, WmState};
use crate::motivation::MotivationPolicy;
use crate::rules::{Action, Production, RuleId};
use crate::simulation::context::SimulationContext;
use crate::simulation::scheduler::EventKind;

/// A request to one of the asynchronous modules
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModuleRequest {
    Attend,
    WorkingMemory,
    Retrieval(RetrievalCue),
    Motor(MotorCommand),
}

/// A concrete state change, with every value already bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    SetStep(Step),
    Write { field: WmField, value: Option<Encoding> },
    SetWmState(WmState),
    MarkChecked,
    ConsumeMotivation,
    Request(ModuleRequest),
    InvalidateRetrieval,
    ClearTrial,
}

/// A selected rule waiting for its effects to land
#[derive(Debug, Clone)]
pub struct Firing {
    pub rule: RuleId,
    pub effects: Vec<Effect>,
    pub selected_at: SimTime,
    pub utility: f64,
}

/// Bind a production's action templates against the current records
pub fn instantiate(
    production: &Production,
    ctx: &SimulationContext,
    policy: &dyn MotivationPolicy,
) -> Vec<Effect> {
    let percept = ctx.visual.read();
    let note = ctx.working_memory.read();
    let mut effects = Vec::with_capacity(production.actions.len());

    for action in production.actions {
        match *action {
            Action::SetStep(step) => effects.push(Effect::SetStep(step)),
            Action::RequestAttend => effects.push(Effect::Request(ModuleRequest::Attend)),
            Action::RequestWorkingMemory => {
                effects.push(Effect::Request(ModuleRequest::WorkingMemory))
            }
            Action::Encode(dimension) => {
                let value = percept.and_then(|p| match dimension {
                    Dimension::Shape => p.shape.map(Encoding::Shape),
                    Dimension::Location => p.location.map(Encoding::Location),
                });
                let slot = note.and_then(|n| n.open_slot());
                if let (Some(field), Some(value)) = (slot, value) {
                    effects.push(Effect::Write {
                        field,
                        value: Some(value),
                    });
                }
            }
            Action::EncodeCue => {
                if policy.records_cue() {
                    if let Some(side) = percept.and_then(|p| p.cue) {
                        effects.push(Effect::Write {
                            field: WmField::Value3,
                            value: Some(Encoding::Location(side)),
                        });
                    }
                }
            }
            Action::RequestRetrieval => {
                let cue = RetrievalCue {
                    shape: note.and_then(|n| n.shape()),
                    hand: None,
                };
                effects.push(Effect::Request(ModuleRequest::Retrieval(cue)));
            }
            Action::ConsumeMotivation => effects.push(Effect::ConsumeMotivation),
            Action::SetWmState(state) => effects.push(Effect::SetWmState(state)),
            Action::MarkChecked => effects.push(Effect::MarkChecked),
            Action::InvalidateRetrieval => effects.push(Effect::InvalidateRetrieval),
            Action::ResetAfterMismatch => {
                for field in policy.mismatch_reset() {
                    effects.push(Effect::Write {
                        field: *field,
                        value: None,
                    });
                }
            }
            Action::RequestMotor => {
                if let Some((hand, rule)) = ctx
                    .retrieval
                    .read()
                    .and_then(|rule| rule.hand.map(|hand| (hand, rule)))
                {
                    effects.push(Effect::Request(ModuleRequest::Motor(MotorCommand {
                        hand,
                        finger: rule.finger,
                    })));
                }
            }
            Action::ClearTrial => effects.push(Effect::ClearTrial),
        }
    }
    effects
}

/// Apply bound effects in order
///
/// Writes to a record that has meanwhile been cleared are dropped; issuing
/// a request to a busy record is an error.
pub fn apply(
    effects: &[Effect],
    ctx: &mut SimulationContext,
    policy: &dyn MotivationPolicy,
    timing: &TimingConfig,
) -> Result<()> {
    for effect in effects {
        match *effect {
            Effect::SetStep(step) => {
                if let Some(goal) = ctx.goal.read_mut() {
                    goal.step = step;
                }
            }
            Effect::Write { field, value } => {
                if let Some(note) = ctx.working_memory.read_mut() {
                    note.set_field(field, value);
                }
            }
            Effect::SetWmState(state) => {
                if let Some(note) = ctx.working_memory.read_mut() {
                    note.state = state;
                }
            }
            Effect::MarkChecked => {
                if let Some(note) = ctx.working_memory.read_mut() {
                    note.checked = true;
                }
            }
            Effect::ConsumeMotivation => {
                if let Some(goal) = ctx.goal.read().cloned() {
                    ctx.goal.set(policy.on_check_attempt(goal));
                }
            }
            Effect::Request(request) => issue(request, ctx, timing)?,
            Effect::InvalidateRetrieval => {
                if let Some(token) = ctx.retrieval.cancel() {
                    tracing::debug!(?token, "cancelled outstanding retrieval");
                }
                ctx.retrieval.clear();
            }
            Effect::ClearTrial => {
                ctx.retrieval.clear();
                ctx.working_memory.clear();
                ctx.goal.clear();
            }
        }
    }
    Ok(())
}

fn issue(request: ModuleRequest, ctx: &mut SimulationContext, timing: &TimingConfig) -> Result<()> {
    let token = ctx.scheduler.token();
    match request {
        ModuleRequest::Attend => {
            ctx.visual.request(token)?;
            ctx.scheduler
                .schedule_in(timing.attend_latency, Some(token), EventKind::Attend);
        }
        ModuleRequest::WorkingMemory => {
            ctx.working_memory.request(token)?;
            ctx.scheduler
                .schedule_in(timing.imaginal_latency, Some(token), EventKind::WorkingMemory);
        }
        ModuleRequest::Retrieval(cue) => {
            ctx.retrieval.request(token)?;
            let sources = ctx
                .working_memory
                .read()
                .map(|n| n.sources())
                .unwrap_or_default();
            let outcome = ctx.memory.retrieve(cue, &sources, &mut ctx.rng);
            ctx.scheduler
                .schedule_in(outcome.latency, Some(token), EventKind::Retrieval(outcome));
        }
        ModuleRequest::Motor(command) => {
            ctx.motor.request(token)?;
            ctx.scheduler
                .schedule_in(timing.motor_latency, Some(token), EventKind::Motor(command));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::error::SimonError;
    use crate::core::types::{Location, Shape};
    use crate::memory::{GoalState, Motivation, Percept, Screen, WorkingMemoryNote};
    use crate::motivation::{ClockMotivation, CountMotivation};
    use crate::rules::get_production;

    fn stimulus_context(note: WorkingMemoryNote) -> SimulationContext {
        let mut ctx = SimulationContext::new(&EngineConfig::default());
        let screen = Screen::Stimulus {
            shape: Shape::Square,
            location: Location::Left,
        };
        ctx.screen = screen;
        ctx.visual.set(Percept::from_screen(screen).unwrap());
        ctx.working_memory.set(note);
        let mut goal = GoalState::new(Motivation::Retries(2), 0.0);
        goal.step = Step::AttendStimulus;
        ctx.goal.set(goal);
        ctx
    }

    #[test]
    fn test_encode_binds_percept_into_open_slot() {
        let ctx = stimulus_context(WorkingMemoryNote {
            value1: Some(Encoding::Location(Location::Left)),
            ..Default::default()
        });
        let policy = CountMotivation { retries: 2 };
        let production = get_production(RuleId::ProcessShape).unwrap();
        let effects = instantiate(production, &ctx, &policy);
        assert_eq!(
            effects,
            vec![Effect::Write {
                field: WmField::Value2,
                value: Some(Encoding::Shape(Shape::Square)),
            }]
        );
    }

    #[test]
    fn test_mismatch_reset_depends_on_policy() {
        let ctx = stimulus_context(WorkingMemoryNote::default());
        let production = get_production(RuleId::CheckDetectProblem).unwrap();

        let count = instantiate(production, &ctx, &CountMotivation { retries: 2 });
        let clock = instantiate(production, &ctx, &ClockMotivation { seconds: 1.0 });
        let cleared = |effects: &[Effect]| {
            effects
                .iter()
                .filter(|e| matches!(e, Effect::Write { value: None, .. }))
                .count()
        };
        assert_eq!(cleared(&count), 1);
        assert_eq!(cleared(&clock), 2);
    }

    #[test]
    fn test_retrieval_request_schedules_completion() {
        let mut ctx = stimulus_context(WorkingMemoryNote {
            value1: Some(Encoding::Shape(Shape::Square)),
            value2: Some(Encoding::Location(Location::Left)),
            ..Default::default()
        });
        let policy = CountMotivation { retries: 2 };
        let production = get_production(RuleId::RetrieveRule).unwrap();
        let effects = instantiate(production, &ctx, &policy);
        apply(&effects, &mut ctx, &policy, &TimingConfig::default()).unwrap();

        assert!(ctx.retrieval.is_busy());
        assert_eq!(ctx.scheduler.pending(), 1);
        let goal = ctx.goal.read().unwrap();
        assert_eq!(goal.step, Step::RetrieveRule);
        assert_eq!(goal.motivation, Motivation::Retries(1));
        assert_eq!(ctx.working_memory.read().unwrap().state, WmState::Processing);
    }

    #[test]
    fn test_request_on_busy_record_is_an_error() {
        let mut ctx = stimulus_context(WorkingMemoryNote::default());
        let policy = CountMotivation { retries: 2 };
        let effects = [
            Effect::Request(ModuleRequest::Attend),
            Effect::Request(ModuleRequest::Attend),
        ];
        let result = apply(&effects, &mut ctx, &policy, &TimingConfig::default());
        assert!(matches!(result, Err(SimonError::RecordBusy("visual"))));
    }

    #[test]
    fn test_clear_trial_retires_records() {
        let mut ctx = stimulus_context(WorkingMemoryNote::default());
        let policy = CountMotivation { retries: 2 };
        apply(&[Effect::ClearTrial], &mut ctx, &policy, &TimingConfig::default()).unwrap();
        assert!(ctx.goal.is_empty());
        assert!(ctx.working_memory.is_empty());
        assert!(ctx.retrieval.is_empty());
    }
}
