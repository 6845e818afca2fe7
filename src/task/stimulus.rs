//! Simon stimuli and the cued design used to generate them

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{Hand, Location, Shape};

/// Side each shape maps to under the task instructions
pub fn mapped_location(shape: Shape) -> Location {
    match shape {
        Shape::Circle => Location::Left,
        Shape::Square => Location::Right,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Congruence {
    Congruent,
    Incongruent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueValidity {
    Valid,
    Invalid,
}

/// Congruence crossed with cue validity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CueCondition {
    CongruentValid,
    IncongruentValid,
    CongruentInvalid,
    IncongruentInvalid,
}

impl CueCondition {
    pub const ALL: [CueCondition; 4] = [
        CueCondition::CongruentValid,
        CueCondition::IncongruentValid,
        CueCondition::CongruentInvalid,
        CueCondition::IncongruentInvalid,
    ];

    pub fn new(congruence: Congruence, validity: CueValidity) -> Self {
        match (congruence, validity) {
            (Congruence::Congruent, CueValidity::Valid) => CueCondition::CongruentValid,
            (Congruence::Incongruent, CueValidity::Valid) => CueCondition::IncongruentValid,
            (Congruence::Congruent, CueValidity::Invalid) => CueCondition::CongruentInvalid,
            (Congruence::Incongruent, CueValidity::Invalid) => CueCondition::IncongruentInvalid,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CueCondition::CongruentValid => "congruent-valid",
            CueCondition::IncongruentValid => "incongruent-valid",
            CueCondition::CongruentInvalid => "congruent-invalid",
            CueCondition::IncongruentInvalid => "incongruent-invalid",
        }
    }

    pub fn congruence(&self) -> Congruence {
        match self {
            CueCondition::CongruentValid | CueCondition::CongruentInvalid => Congruence::Congruent,
            _ => Congruence::Incongruent,
        }
    }

    pub fn validity(&self) -> CueValidity {
        match self {
            CueCondition::CongruentValid | CueCondition::IncongruentValid => CueValidity::Valid,
            _ => CueValidity::Invalid,
        }
    }
}

impl fmt::Display for CueCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One trial's display: a shape at a location, preceded by a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimonStimulus {
    pub shape: Shape,
    pub location: Location,
    pub cue: Location,
}

impl SimonStimulus {
    pub fn new(shape: Shape, location: Location, cue: Location) -> Self {
        Self { shape, location, cue }
    }

    pub fn congruence(&self) -> Congruence {
        if mapped_location(self.shape) == self.location {
            Congruence::Congruent
        } else {
            Congruence::Incongruent
        }
    }

    pub fn is_congruent(&self) -> bool {
        self.congruence() == Congruence::Congruent
    }

    /// A valid cue points at the side the shape maps to
    pub fn validity(&self) -> CueValidity {
        if self.cue == mapped_location(self.shape) {
            CueValidity::Valid
        } else {
            CueValidity::Invalid
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validity() == CueValidity::Valid
    }

    pub fn condition(&self) -> CueCondition {
        CueCondition::new(self.congruence(), self.validity())
    }

    pub fn correct_hand(&self) -> Hand {
        mapped_location(self.shape).hand()
    }
}

/// Build the cued Simon design
///
/// Each condition contributes one circle and one square trial per
/// replication; valid conditions are replicated `floor(n * fraction)` times
/// and invalid ones `floor(n * (1 - fraction))` times.
pub fn generate_stimuli(
    n_trials: usize,
    valid_cue_fraction: f64,
    shuffle: bool,
    rng: &mut impl Rng,
) -> Vec<SimonStimulus> {
    let fraction = valid_cue_fraction.clamp(0.0, 1.0);
    let valid_reps = (n_trials as f64 * fraction).floor() as usize;
    let invalid_reps = (n_trials as f64 * (1.0 - fraction)).floor() as usize;

    let block = |condition: CueCondition| -> [SimonStimulus; 2] {
        Shape::ALL.map(|shape| {
            let home = mapped_location(shape);
            let away = opposite(home);
            let location = match condition.congruence() {
                Congruence::Congruent => home,
                Congruence::Incongruent => away,
            };
            let cue = match condition.validity() {
                CueValidity::Valid => home,
                CueValidity::Invalid => away,
            };
            SimonStimulus::new(shape, location, cue)
        })
    };

    let mut stimuli = Vec::with_capacity(4 * (valid_reps + invalid_reps));
    for condition in CueCondition::ALL {
        let reps = match condition.validity() {
            CueValidity::Valid => valid_reps,
            CueValidity::Invalid => invalid_reps,
        };
        for _ in 0..reps {
            stimuli.extend(block(condition));
        }
    }

    if shuffle {
        stimuli.shuffle(rng);
    }
    stimuli
}

fn opposite(location: Location) -> Location {
    match location {
        Location::Left => Location::Right,
        Location::Right => Location::Left,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::noise::seeded_rng;

    #[test]
    fn test_classification() {
        let s = SimonStimulus::new(Shape::Circle, Location::Right, Location::Left);
        assert_eq!(s.congruence(), Congruence::Incongruent);
        assert_eq!(s.validity(), CueValidity::Valid);
        assert_eq!(s.condition(), CueCondition::IncongruentValid);
        assert_eq!(s.correct_hand(), Hand::Left);

        let s = SimonStimulus::new(Shape::Square, Location::Right, Location::Left);
        assert!(s.is_congruent());
        assert!(!s.is_valid());
    }

    #[test]
    fn test_design_counts() {
        let mut rng = seeded_rng(1);
        let stimuli = generate_stimuli(20, 0.5, false, &mut rng);
        assert_eq!(stimuli.len(), 80);
        for condition in CueCondition::ALL {
            let n = stimuli.iter().filter(|s| s.condition() == condition).count();
            assert_eq!(n, 20, "{condition}");
        }
    }

    #[test]
    fn test_valid_fraction_shifts_design() {
        let mut rng = seeded_rng(1);
        let stimuli = generate_stimuli(8, 0.75, true, &mut rng);
        let valid = stimuli.iter().filter(|s| s.is_valid()).count();
        let invalid = stimuli.len() - valid;
        assert_eq!(valid, 24);
        assert_eq!(invalid, 8);
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let a = generate_stimuli(5, 0.5, true, &mut seeded_rng(4));
        let b = generate_stimuli(5, 0.5, true, &mut seeded_rng(4));
        assert_eq!(a, b);
    }
}
