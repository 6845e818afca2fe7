//! Random sources shared by arbitration and retrieval

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The single random stream owned by a simulation context
pub type SimRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draw zero-mean logistic noise with scale `s`
///
/// Variance is pi^2 s^2 / 3. A zero scale returns exactly zero without
/// consuming the stream, so noiseless runs stay comparable.
pub fn logistic(rng: &mut impl Rng, s: f64) -> f64 {
    if s <= 0.0 {
        return 0.0;
    }
    let u: f64 = rng.gen::<f64>().clamp(1e-12, 1.0 - 1e-12);
    s * (u / (1.0 - u)).ln()
}

/// Indices of the maximal values, in input order
pub fn argmax_set(values: &[f64]) -> Vec<usize> {
    let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == best)
        .map(|(i, _)| i)
        .collect()
}

/// Pick one of the maximal values uniformly at random
pub fn pick_max(rng: &mut impl Rng, values: &[f64]) -> Option<usize> {
    let best = argmax_set(values);
    match best.len() {
        0 => None,
        1 => Some(best[0]),
        n => Some(best[rng.gen_range(0..n)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_scale_is_silent() {
        let mut rng = seeded_rng(7);
        assert_eq!(logistic(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn test_logistic_is_roughly_centered() {
        let mut rng = seeded_rng(11);
        let n = 20_000;
        let mean = (0..n).map(|_| logistic(&mut rng, 0.5)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean was {mean}");
    }

    #[test]
    fn test_ties_are_spread() {
        let mut rng = seeded_rng(3);
        let values = [1.0, 0.5, 1.0];
        let mut seen = [0u32; 3];
        for _ in 0..200 {
            seen[pick_max(&mut rng, &values).unwrap()] += 1;
        }
        assert_eq!(seen[1], 0);
        assert!(seen[0] > 50 && seen[2] > 50);
    }

    #[test]
    fn test_empty_has_no_max() {
        let mut rng = seeded_rng(3);
        assert_eq!(pick_max(&mut rng, &[]), None);
    }
}
