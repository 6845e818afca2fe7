//! Record store: the agent's typed working registers and rule memory

pub mod buffer;
pub mod chunks;
pub mod declarative;

pub use buffer::{Buffer, Occupancy, RequestToken};
pub use chunks::{
    Encoding, GoalState, Motivation, MotorCommand, Percept, PerceptKind, RetrievedRule,
    RuleDefinition, Screen, ScreenKind, WmField, WmState, WorkingMemoryNote,
};
pub use declarative::{ChunkActivation, DeclarativeMemory, RetrievalCue, RetrievalOutcome};
