//! Simon Motivation - a production-system model of the cued Simon task
//!
//! Rules compete for a handful of single-slot records; the winner's effects
//! land one action time later and module requests complete on a discrete
//! event clock. A motivation policy decides how long the agent keeps
//! verifying its retrieved response rule before it commits to a key press.

pub mod core;
pub mod learning;
pub mod memory;
pub mod motivation;
pub mod rules;
pub mod simulation;
pub mod task;
