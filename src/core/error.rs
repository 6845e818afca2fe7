use thiserror::Error;

use crate::core::types::{SimTime, Step};

#[derive(Error, Debug)]
pub enum SimonError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Record '{0}' is busy and cannot accept a new request")]
    RecordBusy(&'static str),

    #[error("Deadlock at t={time:.3}s in step {step:?}: no rule matches and no module is pending")]
    Deadlock { time: SimTime, step: Option<Step> },

    #[error("Trial timed out after {cycles} cycles at t={time:.3}s")]
    TrialTimeout { cycles: u32, time: SimTime },

    #[error("Session is closed; no further trials can run")]
    SessionClosed,

    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimonError>;
