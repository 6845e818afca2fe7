//! Running stimulus lists through the engine

use rayon::prelude::*;
use serde::Serialize;

use crate::core::config::EngineConfig;
use crate::core::error::{Result, SimonError};
use crate::core::noise::seeded_rng;
use crate::core::types::{Hand, SimTime};
use crate::memory::ChunkActivation;
use crate::rules::RuleId;
use crate::simulation::{Engine, Response, RewardRecord, TraceRecord};
use crate::task::feed::StimulusFeed;
use crate::task::output::SessionOutput;
use crate::task::stimulus::{generate_stimuli, CueCondition, SimonStimulus};

/// Offset between the engine seed and the seed that orders the stimuli
const DESIGN_SEED_OFFSET: u64 = 0x5eed;

/// Shape of the stimulus list
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesignConfig {
    /// Replications per condition before the valid/invalid split
    pub n_trials: usize,
    pub valid_cue_fraction: f64,
    pub shuffle: bool,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            n_trials: 20,
            valid_cue_fraction: 0.5,
            shuffle: true,
        }
    }
}

impl DesignConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.valid_cue_fraction) {
            return Err(SimonError::InvalidConfig(format!(
                "valid cue fraction must lie in [0, 1], got {}",
                self.valid_cue_fraction
            )));
        }
        Ok(())
    }
}

/// What happened on one trial
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    pub index: usize,
    pub stimulus: SimonStimulus,
    pub condition: CueCondition,
    pub onset: SimTime,
    pub stimulus_onset: SimTime,
    /// `None` when the trial hit the safety cap before a key press
    pub response: Option<Response>,
    /// Seconds from stimulus onset to key press
    pub response_time: Option<f64>,
    /// False for wrong-hand and unanswered trials
    pub accurate: bool,
    pub corrections: u32,
    pub retrieval_failures: u32,
    pub checked_by: Option<RuleId>,
    /// Utilities of the encoding rules after the trial
    pub utilities: Vec<(RuleId, f64)>,
    /// Last retrieval's activation per rule chunk
    pub activations: Vec<ChunkActivation>,
    pub competitive_firings: Vec<TraceRecord>,
    pub rewards: Vec<RewardRecord>,
}

impl TrialRecord {
    pub fn accuracy(&self) -> f64 {
        if self.accurate {
            1.0
        } else {
            0.0
        }
    }

    pub fn response_hand(&self) -> Option<Hand> {
        self.response.map(|r| r.hand)
    }

    pub fn timed_out(&self) -> bool {
        self.response.is_none()
    }
}

/// One session: a stimulus list run in order through a single engine
///
/// Utilities learned on one trial carry into the next.
#[derive(Debug)]
pub struct SimonTask {
    engine: Engine,
    stimuli: Vec<SimonStimulus>,
    records: Vec<TrialRecord>,
    timeouts: u32,
}

impl SimonTask {
    pub fn new(config: EngineConfig, stimuli: Vec<SimonStimulus>) -> Result<Self> {
        Ok(Self {
            engine: Engine::new(config)?,
            stimuli,
            records: Vec::new(),
            timeouts: 0,
        })
    }

    /// Generate the stimulus list from `design`, ordered by the config seed
    pub fn with_design(config: EngineConfig, design: &DesignConfig) -> Result<Self> {
        design.validate()?;
        let mut rng = seeded_rng(config.seed.wrapping_add(DESIGN_SEED_OFFSET));
        let stimuli = generate_stimuli(
            design.n_trials,
            design.valid_cue_fraction,
            design.shuffle,
            &mut rng,
        );
        Self::new(config, stimuli)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn stimuli(&self) -> &[SimonStimulus] {
        &self.stimuli
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Trials abandoned at the safety cap
    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    /// Run every stimulus, then close the session
    ///
    /// A trial that hits the cycle or time cap is recorded without a
    /// response and scored inaccurate; any other failure ends the session.
    pub fn run(&mut self) -> Result<()> {
        for (index, stimulus) in self.stimuli.iter().enumerate() {
            let mut feed = StimulusFeed::new(*stimulus);
            let (response, log) = match self.engine.run_trial(&mut feed) {
                Ok(outcome) => (Some(outcome.response), outcome.log),
                Err(SimonError::TrialTimeout { cycles, time }) => {
                    tracing::warn!(trial = index, cycles, time, "trial abandoned");
                    self.timeouts += 1;
                    (None, self.engine.trial_log().clone())
                }
                Err(e) => return Err(e),
            };

            let stimulus_onset = log.stimulus_onset.unwrap_or(log.onset);
            let record = TrialRecord {
                index,
                stimulus: *stimulus,
                condition: stimulus.condition(),
                onset: log.onset,
                stimulus_onset,
                response,
                response_time: response.map(|r| r.time - stimulus_onset),
                accurate: response.map_or(false, |r| r.hand == stimulus.correct_hand()),
                corrections: log.corrections,
                retrieval_failures: log.retrieval_failures,
                checked_by: log.checked_by,
                utilities: self.engine.utilities().competitive_snapshot(),
                competitive_firings: log.competitive_firings().copied().collect(),
                activations: log.activations,
                rewards: log.rewards,
            };
            tracing::debug!(
                trial = index,
                condition = %record.condition,
                rt = ?record.response_time,
                accurate = record.accurate,
                "trial recorded"
            );
            self.records.push(record);
        }
        self.engine.close_session();
        Ok(())
    }
}

/// Run one session from config and design
pub fn run_session(config: EngineConfig, design: &DesignConfig) -> Result<SessionOutput> {
    let start = std::time::Instant::now();
    let seed = config.seed;

    // 1. Build the stimulus list and engine
    let mut task = SimonTask::with_design(config, design)?;

    // 2. Run all trials
    task.run()?;

    // 3. Summarize
    let output = SessionOutput::new(seed, &task, start.elapsed());
    tracing::info!(
        seed,
        trials = output.statistics.trials_completed,
        timeouts = output.statistics.trials_timed_out,
        ms = output.statistics.simulation_time_ms,
        "session finished"
    );
    Ok(output)
}

/// Run `sessions` independent sessions in parallel
///
/// Session `i` uses seed `config.seed + i`; results come back in seed order.
pub fn simulate_sessions(
    config: &EngineConfig,
    design: &DesignConfig,
    sessions: usize,
) -> Result<Vec<SessionOutput>> {
    config.validate()?;
    design.validate()?;
    (0..sessions)
        .into_par_iter()
        .map(|i| {
            let seed = config.seed.wrapping_add(i as u64);
            run_session(config.clone().with_seed(seed), design)
        })
        .collect()
}
