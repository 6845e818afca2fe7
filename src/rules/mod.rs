//! Rule base: condition/action productions

pub mod catalog;
pub mod productions;

pub use catalog::{get_production, RULE_BASE};
pub use productions::{Action, Condition, Production, Record, RuleId};
