//! Per-condition accuracy and response times

use serde::Serialize;

use crate::task::session::TrialRecord;
use crate::task::stimulus::{Congruence, CueCondition, CueValidity};

/// N, accuracy and mean response time over a group of trials
///
/// Unanswered trials count toward N and score zero accuracy; the mean RT
/// covers answered trials only. Accuracy is `None` for an empty group and
/// RT is `None` when no trial was answered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupStats {
    pub n: usize,
    pub accuracy: Option<f64>,
    pub mean_rt: Option<f64>,
}

impl GroupStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a TrialRecord>) -> Self {
        let (n, correct, answered, rt) = records.into_iter().fold(
            (0usize, 0.0, 0usize, 0.0),
            |(n, correct, answered, rt), r| match r.response_time {
                Some(t) => (n + 1, correct + r.accuracy(), answered + 1, rt + t),
                None => (n + 1, correct, answered, rt),
            },
        );
        Self {
            n,
            accuracy: (n > 0).then(|| correct / n as f64),
            mean_rt: (answered > 0).then(|| rt / answered as f64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConditionStats {
    pub condition: CueCondition,
    #[serde(flatten)]
    pub stats: GroupStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub overall: GroupStats,
    pub by_condition: Vec<ConditionStats>,
    pub congruent: GroupStats,
    pub incongruent: GroupStats,
    pub valid: GroupStats,
    pub invalid: GroupStats,
}

impl SessionStats {
    pub fn from_records(records: &[TrialRecord]) -> Self {
        let by_congruence = |c: Congruence| {
            GroupStats::from_records(records.iter().filter(|r| r.condition.congruence() == c))
        };
        let by_validity = |v: CueValidity| {
            GroupStats::from_records(records.iter().filter(|r| r.condition.validity() == v))
        };

        Self {
            overall: GroupStats::from_records(records),
            by_condition: CueCondition::ALL
                .iter()
                .map(|&condition| ConditionStats {
                    condition,
                    stats: GroupStats::from_records(
                        records.iter().filter(|r| r.condition == condition),
                    ),
                })
                .collect(),
            congruent: by_congruence(Congruence::Congruent),
            incongruent: by_congruence(Congruence::Incongruent),
            valid: by_validity(CueValidity::Valid),
            invalid: by_validity(CueValidity::Invalid),
        }
    }

    pub fn condition(&self, condition: CueCondition) -> Option<&ConditionStats> {
        self.by_condition.iter().find(|c| c.condition == condition)
    }

    /// Simon effect in seconds: incongruent minus congruent mean RT
    pub fn simon_effect(&self) -> Option<f64> {
        Some(self.incongruent.mean_rt? - self.congruent.mean_rt?)
    }

    /// Cue validity effect in seconds: invalid minus valid mean RT
    pub fn cue_effect(&self) -> Option<f64> {
        Some(self.invalid.mean_rt? - self.valid.mean_rt?)
    }
}

/// Accuracy and RT reported for one human group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmpiricalPoint {
    pub accuracy: f64,
    pub mean_rt: f64,
}

/// Boksem et al. (2006), congruent and incongruent
pub const BOKSEM_CONGRUENCE: [(Congruence, EmpiricalPoint); 2] = [
    (
        Congruence::Congruent,
        EmpiricalPoint {
            accuracy: 1.0 - 0.075,
            mean_rt: 0.451,
        },
    ),
    (
        Congruence::Incongruent,
        EmpiricalPoint {
            accuracy: 1.0 - 0.153,
            mean_rt: 0.483,
        },
    ),
];

/// Boksem et al. (2006), valid and invalid cues
pub const BOKSEM_CUE: [(CueValidity, EmpiricalPoint); 2] = [
    (
        CueValidity::Valid,
        EmpiricalPoint {
            accuracy: 1.0 - 0.071,
            mean_rt: 0.446,
        },
    ),
    (
        CueValidity::Invalid,
        EmpiricalPoint {
            accuracy: 1.0 - 0.157,
            mean_rt: 0.488,
        },
    ),
];

/// Root mean squared distance from the human data
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelFit {
    pub accuracy_rmse: f64,
    pub rt_rmse: f64,
}

/// Fit against the four Boksem group means; `None` if any group is empty
pub fn model_fit(stats: &SessionStats) -> Option<ModelFit> {
    let model = [
        stats.congruent,
        stats.incongruent,
        stats.valid,
        stats.invalid,
    ];
    let human = [
        BOKSEM_CONGRUENCE[0].1,
        BOKSEM_CONGRUENCE[1].1,
        BOKSEM_CUE[0].1,
        BOKSEM_CUE[1].1,
    ];

    let mut acc_sq = 0.0;
    let mut rt_sq = 0.0;
    for (m, h) in model.iter().zip(&human) {
        acc_sq += (m.accuracy? - h.accuracy).powi(2);
        rt_sq += (m.mean_rt? - h.mean_rt).powi(2);
    }
    let n = model.len() as f64;
    Some(ModelFit {
        accuracy_rmse: (acc_sq / n).sqrt(),
        rt_rmse: (rt_sq / n).sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Finger, Hand, Location, Shape};
    use crate::simulation::Response;
    use crate::task::stimulus::SimonStimulus;

    fn record(stimulus: SimonStimulus, hand: Hand, rt: f64) -> TrialRecord {
        TrialRecord {
            index: 0,
            stimulus,
            condition: stimulus.condition(),
            onset: 0.0,
            stimulus_onset: 0.5,
            response: Some(Response {
                hand,
                finger: Finger::Index,
                key: hand.key(),
                time: 0.5 + rt,
            }),
            response_time: Some(rt),
            accurate: hand == stimulus.correct_hand(),
            corrections: 0,
            retrieval_failures: 0,
            checked_by: None,
            utilities: vec![],
            activations: vec![],
            competitive_firings: vec![],
            rewards: vec![],
        }
    }

    fn unanswered(stimulus: SimonStimulus) -> TrialRecord {
        let mut r = record(stimulus, stimulus.correct_hand(), 0.0);
        r.response = None;
        r.response_time = None;
        r.accurate = false;
        r
    }

    fn sample() -> Vec<TrialRecord> {
        vec![
            // congruent valid
            record(SimonStimulus::new(Shape::Circle, Location::Left, Location::Left), Hand::Left, 0.4),
            // incongruent valid, wrong hand
            record(SimonStimulus::new(Shape::Circle, Location::Right, Location::Left), Hand::Right, 0.6),
            // incongruent invalid
            record(SimonStimulus::new(Shape::Square, Location::Left, Location::Left), Hand::Right, 0.5),
        ]
    }

    #[test]
    fn test_condition_breakdown() {
        let stats = SessionStats::from_records(&sample());
        assert_eq!(stats.overall.n, 3);

        let cv = stats.condition(CueCondition::CongruentValid).unwrap();
        assert_eq!(cv.stats.n, 1);
        assert_eq!(cv.stats.accuracy, Some(1.0));

        let ci = stats.condition(CueCondition::CongruentInvalid).unwrap();
        assert_eq!(ci.stats.n, 0);
        assert_eq!(ci.stats.mean_rt, None);

        assert_eq!(stats.incongruent.n, 2);
        assert_eq!(stats.incongruent.accuracy, Some(0.5));
        assert!((stats.incongruent.mean_rt.unwrap() - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_effects() {
        let stats = SessionStats::from_records(&sample());
        assert!((stats.simon_effect().unwrap() - 0.15).abs() < 1e-12);
        // valid: 0.4 and 0.6; invalid: 0.5
        assert!((stats.cue_effect().unwrap() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_unanswered_trials_lower_accuracy_only() {
        let s = SimonStimulus::new(Shape::Circle, Location::Left, Location::Left);
        let records = vec![record(s, Hand::Left, 0.4), unanswered(s), record(s, Hand::Left, 0.6)];
        let group = GroupStats::from_records(&records);
        assert_eq!(group.n, 3);
        assert!((group.accuracy.unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((group.mean_rt.unwrap() - 0.5).abs() < 1e-12);

        let silent = GroupStats::from_records(&records[1..2]);
        assert_eq!(silent.n, 1);
        assert_eq!(silent.accuracy, Some(0.0));
        assert_eq!(silent.mean_rt, None);
    }

    #[test]
    fn test_fit_needs_every_group() {
        let records: Vec<TrialRecord> = sample().into_iter().take(1).collect();
        let stats = SessionStats::from_records(&records);
        assert!(model_fit(&stats).is_none());
    }

    #[test]
    fn test_fit_is_zero_on_human_means() {
        let point = |p: EmpiricalPoint| GroupStats {
            n: 1,
            accuracy: Some(p.accuracy),
            mean_rt: Some(p.mean_rt),
        };
        let stats = SessionStats {
            overall: GroupStats::from_records(std::iter::empty()),
            by_condition: vec![],
            congruent: point(BOKSEM_CONGRUENCE[0].1),
            incongruent: point(BOKSEM_CONGRUENCE[1].1),
            valid: point(BOKSEM_CUE[0].1),
            invalid: point(BOKSEM_CUE[1].1),
        };
        let fit = model_fit(&stats).unwrap();
        assert!(fit.accuracy_rmse.abs() < 1e-12);
        assert!(fit.rt_rmse.abs() < 1e-12);
    }
}
