//! Simulation context: everything one agent's run owns

use crate::core::config::EngineConfig;
use crate::core::noise::{seeded_rng, SimRng};
use crate::core::types::{SimTime, Step};
use crate::learning::UtilityTable;
use crate::memory::{
    Buffer, DeclarativeMemory, GoalState, MotorCommand, Percept, RetrievedRule, Screen,
    WorkingMemoryNote,
};
use crate::rules::Record;
use crate::simulation::scheduler::Scheduler;

/// Occupancy and busy state of one record, as seen by the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordState {
    pub busy: bool,
    pub empty: bool,
    pub full: bool,
    pub failed: bool,
}

impl RecordState {
    fn of<T>(buffer: &Buffer<T>) -> Self {
        Self {
            busy: buffer.is_busy(),
            empty: buffer.is_empty(),
            full: buffer.is_full(),
            failed: buffer.is_failed(),
        }
    }
}

#[derive(Debug)]
pub struct SimulationContext {
    pub scheduler: Scheduler,
    pub visual: Buffer<Percept>,
    pub working_memory: Buffer<WorkingMemoryNote>,
    pub retrieval: Buffer<RetrievedRule>,
    pub goal: Buffer<GoalState>,
    pub motor: Buffer<MotorCommand>,
    pub screen: Screen,
    pub memory: DeclarativeMemory,
    pub utilities: UtilityTable,
    pub rng: SimRng,
}

impl SimulationContext {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scheduler: Scheduler::new(),
            visual: Buffer::new("visual"),
            working_memory: Buffer::new("working-memory"),
            retrieval: Buffer::new("retrieval"),
            goal: Buffer::new("goal"),
            motor: Buffer::new("motor"),
            screen: Screen::Blank,
            memory: DeclarativeMemory::new(&config.memory),
            utilities: UtilityTable::new(&config.utility),
            rng: seeded_rng(config.seed),
        }
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn step(&self) -> Option<Step> {
        self.goal.read().map(|g| g.step)
    }

    pub fn record_state(&self, record: Record) -> RecordState {
        match record {
            Record::Visual => RecordState::of(&self.visual),
            Record::WorkingMemory => RecordState::of(&self.working_memory),
            Record::Retrieval => RecordState::of(&self.retrieval),
            Record::Goal => RecordState::of(&self.goal),
            Record::Motor => RecordState::of(&self.motor),
        }
    }

    /// Retire everything left over from the previous trial
    ///
    /// Learned utilities, declarative memory, the clock and the random
    /// stream carry over.
    pub fn reset_for_trial(&mut self) {
        self.scheduler.clear();
        self.visual.clear();
        self.working_memory.clear();
        self.retrieval.clear();
        self.goal.clear();
        self.motor.clear();
        self.screen = Screen::Blank;
    }
}
