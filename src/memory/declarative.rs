//! Associative retrieval of stimulus-response rules
//!
//! Each retrieval computes an activation per rule chunk:
//!
//! ```text
//! A_i = B_i + sum_j W_j * S_ji - P * mismatches_i + noise
//! ```
//!
//! where sources j are the working-memory values, `S_ji = S - ln(fan_j)`
//! for chunks that mention j, and mismatches count cue slots the chunk
//! disagrees with. The most active chunk wins if it clears the retrieval
//! threshold; latency is `F * exp(-A)` (or `F * exp(-threshold)` on failure).

use rand::Rng;
use serde::Serialize;

use crate::core::config::MemoryConfig;
use crate::core::noise::{logistic, pick_max};
use crate::core::types::{Hand, Shape};
use crate::memory::chunks::{Encoding, RetrievedRule, RuleDefinition};

/// Slots a retrieval request asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RetrievalCue {
    pub shape: Option<Shape>,
    pub hand: Option<Hand>,
}

impl RetrievalCue {
    pub fn by_shape(shape: Shape) -> Self {
        Self {
            shape: Some(shape),
            hand: None,
        }
    }

    fn mismatches(&self, rule: &RuleDefinition) -> u32 {
        let shape = self.shape.map_or(0, |s| (s != rule.shape) as u32);
        let hand = self.hand.map_or(0, |h| (Some(h) != rule.hand) as u32);
        shape + hand
    }
}

/// Activation of one chunk on one retrieval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkActivation {
    pub name: String,
    pub activation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalOutcome {
    /// `None` when no chunk cleared the threshold
    pub rule: Option<RetrievedRule>,
    pub latency: f64,
    pub activations: Vec<ChunkActivation>,
}

#[derive(Debug, Clone)]
struct RuleChunk {
    definition: RuleDefinition,
    base_level: f64,
}

#[derive(Debug, Clone)]
pub struct DeclarativeMemory {
    chunks: Vec<RuleChunk>,
    activation_noise: f64,
    retrieval_threshold: f64,
    latency_factor: f64,
    mismatch_penalty: f64,
    max_associative_strength: Option<f64>,
    imaginal_activation: f64,
}

impl DeclarativeMemory {
    pub fn new(config: &MemoryConfig) -> Self {
        let chunks = config
            .rules
            .iter()
            .map(|definition| RuleChunk {
                base_level: config.base_levels.get(&definition.name).copied().unwrap_or(0.0),
                definition: definition.clone(),
            })
            .collect();

        Self {
            chunks,
            activation_noise: config.activation_noise,
            retrieval_threshold: config.retrieval_threshold,
            latency_factor: config.latency_factor,
            mismatch_penalty: config.mismatch_penalty,
            max_associative_strength: config.max_associative_strength,
            imaginal_activation: config.imaginal_activation,
        }
    }

    pub fn definitions(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.chunks.iter().map(|c| &c.definition)
    }

    /// Number of chunks a source value appears in, plus one for the source itself
    fn fan(&self, source: Encoding) -> f64 {
        let mentions = self
            .chunks
            .iter()
            .filter(|c| c.definition.mentions(source))
            .count();
        (mentions + 1) as f64
    }

    fn spreading(&self, rule: &RuleDefinition, sources: &[Encoding]) -> f64 {
        let Some(strength) = self.max_associative_strength else {
            return 0.0;
        };
        if sources.is_empty() {
            return 0.0;
        }
        let weight = self.imaginal_activation / sources.len() as f64;
        sources
            .iter()
            .filter(|s| rule.mentions(**s))
            .map(|s| weight * (strength - self.fan(*s).ln()))
            .sum()
    }

    /// Activation of every chunk without noise
    pub fn base_activations(&self, cue: RetrievalCue, sources: &[Encoding]) -> Vec<f64> {
        self.chunks
            .iter()
            .map(|chunk| {
                chunk.base_level + self.spreading(&chunk.definition, sources)
                    - self.mismatch_penalty * cue.mismatches(&chunk.definition) as f64
            })
            .collect()
    }

    pub fn retrieve(
        &self,
        cue: RetrievalCue,
        sources: &[Encoding],
        rng: &mut impl Rng,
    ) -> RetrievalOutcome {
        let activations: Vec<f64> = self
            .base_activations(cue, sources)
            .into_iter()
            .map(|a| a + logistic(rng, self.activation_noise))
            .collect();

        let report = self
            .chunks
            .iter()
            .zip(&activations)
            .map(|(chunk, a)| ChunkActivation {
                name: chunk.definition.name.clone(),
                activation: *a,
            })
            .collect();

        let winner = pick_max(rng, &activations)
            .filter(|i| activations[*i] >= self.retrieval_threshold);

        match winner {
            Some(i) => {
                let activation = activations[i];
                RetrievalOutcome {
                    rule: Some(RetrievedRule::from_definition(&self.chunks[i].definition, activation)),
                    latency: self.latency_factor * (-activation).exp(),
                    activations: report,
                }
            }
            None => RetrievalOutcome {
                rule: None,
                latency: self.latency_factor * (-self.retrieval_threshold).exp(),
                activations: report,
            },
        }
    }
}
