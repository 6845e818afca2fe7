//! Decision cycle: scheduler, matcher, arbiter, executor and the engine loop

pub mod arbiter;
pub mod context;
pub mod engine;
pub mod executor;
pub mod matcher;
pub mod scheduler;
pub mod trace;

pub use context::SimulationContext;
pub use engine::{Engine, Response, ScreenFeed, TrialOutcome};
pub use trace::{RewardRecord, TraceRecord, TrialLog};
