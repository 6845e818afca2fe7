//! Session output and serialization

use std::time::Duration;

use serde::Serialize;

use crate::core::config::MotivationConfig;
use crate::rules::RuleId;
use crate::task::session::{SimonTask, TrialRecord};
use crate::task::stats::{model_fit, ModelFit, SessionStats};

/// Complete session output
#[derive(Clone, Debug, Serialize)]
pub struct SessionOutput {
    pub seed: u64,
    pub motivation: MotivationConfig,
    pub trials: Vec<TrialRecord>,
    pub stats: SessionStats,
    pub fit: Option<ModelFit>,
    pub final_utilities: Vec<(RuleId, f64)>,
    pub statistics: SessionStatistics,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionStatistics {
    pub trials_planned: usize,
    pub trials_completed: usize,
    pub trials_timed_out: u32,
    pub total_corrections: u32,
    pub total_retrieval_failures: u32,
    /// Simulated seconds on the engine clock
    pub simulated_time: f64,
    pub simulation_time_ms: u64,
}

impl SessionOutput {
    pub fn new(seed: u64, task: &SimonTask, elapsed: Duration) -> Self {
        let trials = task.records().to_vec();
        let stats = SessionStats::from_records(&trials);
        let engine = task.engine();

        Self {
            seed,
            motivation: engine.config().motivation,
            fit: model_fit(&stats),
            final_utilities: engine.utilities().competitive_snapshot(),
            statistics: SessionStatistics {
                trials_planned: task.stimuli().len(),
                trials_completed: trials.iter().filter(|t| !t.timed_out()).count(),
                trials_timed_out: task.timeouts(),
                total_corrections: trials.iter().map(|t| t.corrections).sum(),
                total_retrieval_failures: trials.iter().map(|t| t.retrieval_failures).sum(),
                simulated_time: engine.now(),
                simulation_time_ms: elapsed.as_millis() as u64,
            },
            stats,
            trials,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let mut out = format!(
            "Seed {}: {}/{} trials in {}ms ({} timed out, {} corrections)\n",
            self.seed,
            self.statistics.trials_completed,
            self.statistics.trials_planned,
            self.statistics.simulation_time_ms,
            self.statistics.trials_timed_out,
            self.statistics.total_corrections,
        );
        for c in &self.stats.by_condition {
            match (c.stats.accuracy, c.stats.mean_rt) {
                (Some(acc), Some(rt)) => out.push_str(&format!(
                    "  {} (N={}): Accuracy = {:.2}, Response Times = {:.2} ms\n",
                    c.condition,
                    c.stats.n,
                    acc,
                    rt * 1000.0
                )),
                (Some(acc), None) => out.push_str(&format!(
                    "  {} (N={}): Accuracy = {:.2}, no response\n",
                    c.condition, c.stats.n, acc
                )),
                _ => out.push_str(&format!("  {} (N=0): no data\n", c.condition)),
            }
        }
        if let Some(fit) = self.fit {
            out.push_str(&format!(
                "  Fit: accuracy RMSE = {:.3}, RT RMSE = {:.1} ms\n",
                fit.accuracy_rmse,
                fit.rt_rmse * 1000.0
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::types::{Location, Shape};
    use crate::task::stimulus::SimonStimulus;

    fn finished_task() -> SimonTask {
        let mut config = EngineConfig::default().with_seed(3);
        config.memory.activation_noise = 0.0;
        let stimuli = vec![
            SimonStimulus::new(Shape::Circle, Location::Left, Location::Left),
            SimonStimulus::new(Shape::Square, Location::Left, Location::Left),
        ];
        let mut task = SimonTask::new(config, stimuli).unwrap();
        task.run().unwrap();
        task
    }

    #[test]
    fn test_statistics() {
        let task = finished_task();
        let output = SessionOutput::new(3, &task, Duration::from_millis(12));
        assert_eq!(output.statistics.trials_planned, 2);
        assert_eq!(output.statistics.trials_completed, 2);
        assert_eq!(output.statistics.simulation_time_ms, 12);
        assert!(output.statistics.simulated_time > 0.0);
        assert_eq!(output.final_utilities.len(), 4);
        assert!(output.summary().contains("congruent-valid (N=1)"));
    }

    #[test]
    fn test_unanswered_trials_not_completed() {
        let mut config = EngineConfig::default().with_seed(3);
        config.memory.retrieval_threshold = 10.0;
        config.limits.max_cycles = 100;
        let stimuli = vec![SimonStimulus::new(Shape::Circle, Location::Right, Location::Left)];
        let mut task = SimonTask::new(config, stimuli).unwrap();
        task.run().unwrap();

        let output = SessionOutput::new(3, &task, Duration::ZERO);
        assert_eq!(output.trials.len(), 1);
        assert_eq!(output.statistics.trials_completed, 0);
        assert_eq!(output.statistics.trials_timed_out, 1);
        assert!(output
            .summary()
            .contains("incongruent-valid (N=1): Accuracy = 0.00, no response"));
    }

    #[test]
    fn test_json_has_trials() {
        let task = finished_task();
        let output = SessionOutput::new(3, &task, Duration::ZERO);
        let value: serde_json::Value = serde_json::from_str(&output.to_json()).unwrap();
        assert_eq!(value["trials"].as_array().unwrap().len(), 2);
        assert_eq!(value["motivation"]["model"], "count");
        assert_eq!(value["trials"][0]["condition"], "congruent-valid");
    }
}
