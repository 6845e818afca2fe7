//! The cued Simon task: stimuli, screens, sessions and their analysis

pub mod feed;
pub mod output;
pub mod session;
pub mod stats;
pub mod stimulus;

pub use feed::StimulusFeed;
pub use output::{SessionOutput, SessionStatistics};
pub use session::{run_session, simulate_sessions, DesignConfig, SimonTask, TrialRecord};
pub use stats::{model_fit, GroupStats, ModelFit, SessionStats};
pub use stimulus::{generate_stimuli, Congruence, CueCondition, CueValidity, SimonStimulus};
