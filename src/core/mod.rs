pub mod config;
pub mod error;
pub mod noise;
pub mod types;

pub use config::{EngineConfig, MotivationConfig};
pub use error::{Result, SimonError};
pub use types::{Dimension, Finger, Hand, Location, Shape, SimTime, Step};
