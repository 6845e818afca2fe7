//! Reward dispatch and utility learning

pub mod reward;
pub mod utility;

pub use reward::{RewardDispatcher, RewardEvent};
pub use utility::{CreditRecord, PendingCredit, UtilityTable};
