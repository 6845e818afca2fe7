//! Engine configuration with documented defaults
//!
//! Every tunable number of the agent lives here. Defaults follow the
//! architecture defaults the Simon model was calibrated against; a TOML
//! file may override any subset of them, section by section.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::core::error::{Result, SimonError};
use crate::memory::RuleDefinition;
use crate::rules::RuleId;

/// Complete configuration for one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the single random stream driving every noise source
    pub seed: u64,
    pub timing: TimingConfig,
    pub utility: UtilityConfig,
    pub memory: MemoryConfig,
    pub motivation: MotivationConfig,
    pub reward: RewardConfig,
    pub limits: LimitConfig,
}

/// Module latencies (seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    // === PROCEDURAL ===
    /// Time between selecting a rule and its effects landing
    ///
    /// One decision cycle costs this much simulated time, so a trial with
    /// twelve firings spends 0.6s on rule firing alone at the default.
    pub action_time: f64,

    // === PERCEPTUAL / MOTOR ===
    /// Time to shift attention to the object on screen and encode it
    pub attend_latency: f64,

    /// Time to create a fresh working-memory note
    pub imaginal_latency: f64,

    /// Time from motor command to key press
    pub motor_latency: f64,

    /// Delay between the goal entering a step and the driver showing the
    /// matching screen
    pub screen_delay: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            action_time: 0.05,
            attend_latency: 0.085,
            imaginal_latency: 0.2,
            motor_latency: 0.25,
            screen_delay: 0.01,
        }
    }
}

/// Conflict resolution and utility learning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityConfig {
    /// Scale of the logistic noise added to every utility each cycle
    ///
    /// Zero makes arbitration deterministic up to exact ties, which are
    /// still broken at random.
    pub noise: f64,

    /// Utility below which no rule fires (attention lapse)
    ///
    /// `None` disables the threshold.
    pub threshold: Option<f64>,

    /// Whether reward events update learned utilities
    pub learning: bool,

    /// Learning rate (alpha) of the utility update
    pub learning_rate: f64,

    /// Base utility per rule name; unlisted rules start at 0
    pub base: BTreeMap<String, f64>,
}

impl Default for UtilityConfig {
    fn default() -> Self {
        Self {
            noise: 0.25,
            threshold: None,
            learning: true,
            learning_rate: 0.2,
            base: BTreeMap::new(),
        }
    }
}

/// Associative retrieval of stimulus-response rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Scale of the logistic noise added to each chunk's activation per retrieval
    pub activation_noise: f64,

    /// Activation a chunk needs to be retrieved at all
    pub retrieval_threshold: f64,

    /// Latency factor F in F * exp(-A)
    pub latency_factor: f64,

    /// Activation penalty per cue slot a chunk fails to match
    pub mismatch_penalty: f64,

    /// Maximum associative strength for spreading activation
    ///
    /// `None` turns spreading activation from working memory off.
    pub max_associative_strength: Option<f64>,

    /// Total source activation spread from the working-memory note
    pub imaginal_activation: f64,

    /// Base-level activation per rule chunk name; unlisted chunks use 0
    pub base_levels: BTreeMap<String, f64>,

    /// Stimulus-response rules available for retrieval
    pub rules: Vec<RuleDefinition>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            activation_noise: 0.2,
            retrieval_threshold: -1.0,
            latency_factor: 0.5,
            mismatch_penalty: 1.0,
            max_associative_strength: Some(1.5),
            imaginal_activation: 1.0,
            base_levels: BTreeMap::new(),
            rules: RuleDefinition::simon_defaults(),
        }
    }
}

/// Which motivation model gates verification, and its budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum MotivationConfig {
    /// Number of retrieval attempts the agent is willing to make
    Count { retries: i64 },
    /// Seconds since trial onset during which checking is allowed
    Clock { seconds: f64 },
}

impl Default for MotivationConfig {
    fn default() -> Self {
        MotivationConfig::Count { retries: 1 }
    }
}

/// Reward magnitudes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// When set, a successful check is rewarded with the elapsed time
    /// since fixation onset instead of its table value
    pub time_coupled: bool,

    /// Sparse override table keyed by rule name
    pub table: BTreeMap<String, f64>,
}

/// Per-trial safety caps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum decision cycles (rule selections and event completions) per trial
    pub max_cycles: u32,

    /// Maximum simulated seconds per trial
    pub max_trial_time: f64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_cycles: 1000,
            max_trial_time: 30.0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            timing: TimingConfig::default(),
            utility: UtilityConfig::default(),
            memory: MemoryConfig::default(),
            motivation: MotivationConfig::default(),
            reward: RewardConfig::default(),
            limits: LimitConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_motivation(mut self, motivation: MotivationConfig) -> Self {
        self.motivation = motivation;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        match self.motivation {
            MotivationConfig::Count { retries } if retries < 1 => {
                return Err(invalid(format!(
                    "count motivation must be a positive integer, got {retries}"
                )));
            }
            MotivationConfig::Clock { seconds } if !(seconds.is_finite() && seconds > 0.0) => {
                return Err(invalid(format!(
                    "clock motivation must be a positive duration, got {seconds}"
                )));
            }
            _ => {}
        }

        let t = &self.timing;
        for (name, value) in [
            ("timing.action_time", t.action_time),
            ("timing.attend_latency", t.attend_latency),
            ("timing.imaginal_latency", t.imaginal_latency),
            ("timing.motor_latency", t.motor_latency),
            ("timing.screen_delay", t.screen_delay),
            ("utility.noise", self.utility.noise),
            ("memory.activation_noise", self.memory.activation_noise),
            ("memory.latency_factor", self.memory.latency_factor),
            ("memory.mismatch_penalty", self.memory.mismatch_penalty),
            ("memory.imaginal_activation", self.memory.imaginal_activation),
        ] {
            non_negative(name, value)?;
        }

        // A zero action time would let the same instant host unbounded firings
        if t.action_time <= 0.0 {
            return Err(invalid("timing.action_time must be positive".into()));
        }

        let alpha = self.utility.learning_rate;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(invalid(format!(
                "utility.learning_rate must lie in (0, 1], got {alpha}"
            )));
        }

        for name in self.utility.base.keys() {
            RuleId::from_name(name).ok_or_else(|| SimonError::UnknownRule(name.clone()))?;
        }

        for name in self.reward.table.keys() {
            let rule =
                RuleId::from_name(name).ok_or_else(|| SimonError::UnknownRule(name.clone()))?;
            if !rule.is_reward_site() {
                return Err(invalid(format!(
                    "reward.table entry '{name}' is not a rewarded rule"
                )));
            }
        }

        if self.memory.rules.is_empty() {
            return Err(invalid("memory.rules must define at least one rule".into()));
        }
        let mut names = HashSet::new();
        for rule in &self.memory.rules {
            if !names.insert(rule.name.as_str()) {
                return Err(invalid(format!("duplicate rule definition '{}'", rule.name)));
            }
        }
        for name in self.memory.base_levels.keys() {
            if !names.contains(name.as_str()) {
                return Err(SimonError::UnknownRule(name.clone()));
            }
        }

        if self.limits.max_cycles == 0 {
            return Err(invalid("limits.max_cycles must be positive".into()));
        }
        if !(self.limits.max_trial_time > 0.0) {
            return Err(invalid("limits.max_trial_time must be positive".into()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> SimonError {
    SimonError::InvalidConfig(message)
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a non-negative number, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_count() {
        let config = EngineConfig::default().with_motivation(MotivationConfig::Count { retries: 0 });
        assert!(matches!(config.validate(), Err(SimonError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_negative_clock() {
        let config =
            EngineConfig::default().with_motivation(MotivationConfig::Clock { seconds: -0.5 });
        assert!(matches!(config.validate(), Err(SimonError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_unknown_reward_rule() {
        let mut config = EngineConfig::default();
        config.reward.table.insert("check-everything".into(), 1.0);
        assert!(matches!(
            config.validate(),
            Err(SimonError::UnknownRule(name)) if name == "check-everything"
        ));
    }

    #[test]
    fn test_rejects_unknown_names_in_tables() {
        let mut config = EngineConfig::default();
        config.utility.base.insert("process-colour".into(), 1.0);
        assert!(matches!(config.validate(), Err(SimonError::UnknownRule(_))));

        let mut config = EngineConfig::default();
        config.memory.base_levels.insert("triangle-left".into(), 1.0);
        assert!(matches!(
            config.validate(),
            Err(SimonError::UnknownRule(name)) if name == "triangle-left"
        ));
    }

    #[test]
    fn test_rejects_reward_on_unrewarded_rule() {
        let mut config = EngineConfig::default();
        config.reward.table.insert("attend-cue".into(), 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parses_partial_toml() {
        let text = r#"
            seed = 42

            [motivation]
            model = "clock"
            seconds = 1.5

            [reward]
            time_coupled = true

            [reward.table]
            "check-detect-problem" = -0.1

            [utility.base]
            "process-shape" = 1.0
        "#;
        let config = EngineConfig::from_toml_str(text).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.motivation, MotivationConfig::Clock { seconds: 1.5 });
        assert!(config.reward.time_coupled);
        assert_eq!(config.reward.table.get("check-detect-problem"), Some(&-0.1));
        assert_eq!(config.utility.base.get("process-shape"), Some(&1.0));
        // Untouched sections keep their defaults
        assert_eq!(config.timing.action_time, 0.05);
        assert_eq!(config.memory.rules.len(), 2);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = EngineConfig::from_toml_str("[motivation]\nmodel = \"count\"\nretries = -2\n");
        assert!(matches!(result, Err(SimonError::InvalidConfig(_))));

        let result = EngineConfig::from_toml_str("seed = \"not a number\"");
        assert!(matches!(result, Err(SimonError::ConfigParse(_))));
    }
}
