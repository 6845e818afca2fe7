//! The decision engine: match, arbitrate, fire, wait
//!
//! One trial runs as a loop over two kinds of steps. When no rule is
//! mid-firing, the matcher and arbiter pick a rule and schedule its effects
//! one action time later. Otherwise the scheduler advances the clock to the
//! next completion and applies it. The trial ends when the key press lands.

use serde::Serialize;

use crate::core::config::EngineConfig;
use crate::core::error::{Result, SimonError};
use crate::core::types::{Finger, Hand, SimTime, Step};
use crate::learning::{PendingCredit, RewardDispatcher, UtilityTable};
use crate::memory::{GoalState, MotorCommand, Percept, RequestToken, RetrievalOutcome, Screen, WorkingMemoryNote};
use crate::motivation::{policy_for, MotivationPolicy};
use crate::rules::{RuleId, RULE_BASE};
use crate::simulation::arbiter;
use crate::simulation::context::SimulationContext;
use crate::simulation::executor::{apply, instantiate, Firing};
use crate::simulation::matcher::{matching_rules, MatchContext};
use crate::simulation::scheduler::EventKind;
use crate::simulation::trace::{RewardRecord, TraceRecord, TrialLog};

/// Source of the displays the agent looks at
///
/// The engine asks for a screen when a trial starts and whenever the goal
/// moves to a new step; a returned screen appears after `timing.screen_delay`.
pub trait ScreenFeed {
    fn on_trial_start(&mut self) -> Option<Screen>;
    fn on_step(&mut self, step: Step) -> Option<Screen>;
}

/// The single key press that ends a trial
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Response {
    pub hand: Hand,
    pub finger: Finger,
    pub key: char,
    pub time: SimTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrialOutcome {
    pub response: Response,
    pub log: TrialLog,
}

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    ctx: SimulationContext,
    policy: Box<dyn MotivationPolicy>,
    rewards: RewardDispatcher,
    log: TrialLog,
    trials_run: u32,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ctx: SimulationContext::new(&config),
            policy: policy_for(&config.motivation),
            rewards: RewardDispatcher::new(&config.reward),
            log: TrialLog::default(),
            trials_run: 0,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn utilities(&self) -> &UtilityTable {
        &self.ctx.utilities
    }

    pub fn policy(&self) -> &dyn MotivationPolicy {
        self.policy.as_ref()
    }

    pub fn now(&self) -> SimTime {
        self.ctx.now()
    }

    pub fn trials_run(&self) -> u32 {
        self.trials_run
    }

    /// Log of the trial in progress, or of the last one that failed
    pub fn trial_log(&self) -> &TrialLog {
        &self.log
    }

    /// Show the closing screen; later trials are refused
    pub fn close_session(&mut self) {
        self.ctx.reset_for_trial();
        self.ctx.screen = Screen::Done;
    }

    /// Run one trial to its key press
    pub fn run_trial(&mut self, feed: &mut dyn ScreenFeed) -> Result<TrialOutcome> {
        if self.ctx.screen == Screen::Done {
            return Err(SimonError::SessionClosed);
        }

        // 1. Fresh records and goal
        self.ctx.reset_for_trial();
        let onset = self.ctx.now();
        self.log = TrialLog::new(onset);
        let goal = GoalState::new(self.policy.initial(), onset);
        self.log.final_motivation = Some(goal.motivation);
        self.ctx.goal.set(goal);
        self.trials_run += 1;
        tracing::debug!(trial = self.trials_run, onset, "trial started");

        // 2. First display
        if let Some(screen) = feed.on_trial_start() {
            self.show_later(screen);
        }

        // 3. Decision cycles until the key press
        let mut firing_pending = false;
        loop {
            self.log.cycles += 1;
            let now = self.ctx.now();
            if self.log.cycles > self.config.limits.max_cycles
                || now - onset > self.config.limits.max_trial_time
            {
                tracing::warn!(cycles = self.log.cycles, time = now, "trial timed out");
                return Err(SimonError::TrialTimeout {
                    cycles: self.log.cycles,
                    time: now,
                });
            }

            if !firing_pending {
                if let Some(firing) = self.select() {
                    self.ctx.scheduler.schedule_in(
                        self.config.timing.action_time,
                        None,
                        EventKind::Fire(firing),
                    );
                    firing_pending = true;
                    continue;
                }
            }

            let Some(event) = self.ctx.scheduler.pop() else {
                return Err(SimonError::Deadlock {
                    time: now,
                    step: self.ctx.step(),
                });
            };

            match (event.kind, event.token) {
                (EventKind::Fire(firing), _) => {
                    firing_pending = false;
                    self.fire(firing, feed)?;
                }
                (EventKind::Screen(screen), _) => self.show(screen),
                (EventKind::Motor(command), Some(token)) => {
                    if self.ctx.motor.complete(token, command) {
                        return Ok(self.finish(command));
                    }
                }
                (kind, Some(token)) => self.complete(kind, token),
                (kind, None) => tracing::trace!(?kind, "module event without a request token"),
            }
        }
    }

    /// Match and arbitrate; bind the winner's effects
    fn select(&mut self) -> Option<Firing> {
        let now = self.ctx.now();
        let mc = MatchContext {
            ctx: &self.ctx,
            policy: self.policy.as_ref(),
            commit_time: now + self.config.timing.action_time,
        };
        let matches = matching_rules(RULE_BASE, &mc);
        if matches.is_empty() {
            return None;
        }

        let selection = arbiter::select(
            &matches,
            &self.ctx.utilities,
            &self.config.utility,
            &mut self.ctx.rng,
        );
        let winner = selection.winner?;
        let production = matches.iter().find(|p| p.id == winner.rule)?;
        tracing::trace!(rule = %winner.rule, utility = winner.utility, candidates = matches.len(), "selected");

        Some(Firing {
            rule: winner.rule,
            effects: instantiate(production, &self.ctx, self.policy.as_ref()),
            selected_at: now,
            utility: winner.utility,
        })
    }

    fn fire(&mut self, firing: Firing, feed: &mut dyn ScreenFeed) -> Result<()> {
        let now = self.ctx.now();
        let rule = firing.rule;
        let step_before = self.ctx.step();

        apply(&firing.effects, &mut self.ctx, self.policy.as_ref(), &self.config.timing)?;
        tracing::debug!(rule = %rule, time = now, "fired");

        self.log.firings.push(TraceRecord {
            rule,
            selected_at: firing.selected_at,
            fired_at: now,
            utility: firing.utility,
        });
        self.log.pending_credit.push(PendingCredit { rule, fired_at: now });

        match rule {
            RuleId::CheckDetectProblem => self.log.corrections += 1,
            RuleId::RetrievalFailure => self.log.retrieval_failures += 1,
            RuleId::CheckPass | RuleId::DontCheck => self.log.checked_by = Some(rule),
            _ => {}
        }
        if let Some(goal) = self.ctx.goal.read_mut() {
            if rule.is_check() || rule == RuleId::DontCheck {
                goal.time_duration = Some(goal.elapsed(now));
            }
            self.log.final_motivation = Some(goal.motivation);
        }

        if let Some(event) = self.rewards.dispatch(rule, self.log.onset, now) {
            let credits =
                self.ctx
                    .utilities
                    .apply_reward(event.magnitude, now, &self.log.pending_credit);
            self.log.pending_credit.clear();
            tracing::debug!(rule = %rule, reward = event.magnitude, credited = credits.len(), "reward");
            self.log.rewards.push(RewardRecord { event, credits });
        }

        let step_after = self.ctx.step();
        if step_after == Some(Step::AttendStimulus) && self.log.stimulus_onset.is_none() {
            self.log.stimulus_onset = Some(now);
        }
        if step_after != step_before {
            if let Some(screen) = step_after.and_then(|step| feed.on_step(step)) {
                self.show_later(screen);
            }
        }
        Ok(())
    }

    /// Apply a module completion; stale tokens are ignored
    fn complete(&mut self, kind: EventKind, token: RequestToken) {
        let applied = match kind {
            EventKind::Attend => match Percept::from_screen(self.ctx.screen) {
                Some(percept) => self.ctx.visual.complete(token, percept),
                None => self.ctx.visual.fail(token),
            },
            EventKind::WorkingMemory => self
                .ctx
                .working_memory
                .complete(token, WorkingMemoryNote::default()),
            EventKind::Retrieval(RetrievalOutcome {
                rule, activations, ..
            }) => {
                let applied = match rule {
                    Some(rule) => self.ctx.retrieval.complete(token, rule),
                    None => {
                        let failed = self.ctx.retrieval.fail(token);
                        if failed {
                            tracing::warn!(time = self.ctx.now(), "retrieval failed");
                        }
                        failed
                    }
                };
                if applied {
                    self.log.activations = activations;
                }
                applied
            }
            other => {
                tracing::trace!(?other, "not a module completion");
                true
            }
        };
        if !applied {
            tracing::trace!(?token, "stale completion ignored");
        }
    }

    fn show(&mut self, screen: Screen) {
        self.ctx.screen = screen;
    }

    fn show_later(&mut self, screen: Screen) {
        self.ctx
            .scheduler
            .schedule_in(self.config.timing.screen_delay, None, EventKind::Screen(screen));
    }

    fn finish(&mut self, command: MotorCommand) -> TrialOutcome {
        let now = self.ctx.now();
        let response = Response {
            hand: command.hand,
            finger: command.finger,
            key: command.hand.key(),
            time: now,
        };
        tracing::debug!(
            hand = command.hand.name(),
            time = now,
            corrections = self.log.corrections,
            "response"
        );
        TrialOutcome {
            response,
            log: std::mem::take(&mut self.log),
        }
    }
}
