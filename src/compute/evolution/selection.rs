//! Roulette-wheel (fitness-proportionate) parent selection.

use log::warn;
use rand::Rng;

use crate::schema::ScoreScaling;

/// A wheel with one slot per individual, sized by its weight.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    weights: Vec<f64>,
    total: f64,
}

impl RouletteWheel {
    /// Build a wheel from fitness scores.
    pub fn new(scores: &[i64], scaling: ScoreScaling) -> Self {
        let weights: Vec<f64> = match scaling {
            ScoreScaling::Clamp => scores.iter().map(|&s| s.max(0) as f64).collect(),
            ScoreScaling::Shift => {
                let min = scores.iter().copied().min().unwrap_or(0);
                scores.iter().map(|&s| (s - min) as f64).collect()
            }
        };
        let total = weights.iter().sum();
        Self { weights, total }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// True when no individual has positive weight. Spins then fall back to
    /// uniform selection.
    pub fn is_degenerate(&self) -> bool {
        self.total <= 0.0
    }

    /// Draw one index.
    ///
    /// # Panics
    ///
    /// Panics if the wheel is empty.
    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        assert!(!self.is_empty(), "cannot spin an empty roulette wheel");

        if self.is_degenerate() {
            return rng.gen_range(0..self.len());
        }

        let target = rng.r#gen::<f64>() * self.total;
        let mut cumulative = 0.0;
        let mut last_positive = 0;
        for (i, &weight) in self.weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last_positive = i;
            if cumulative > target {
                return i;
            }
        }
        // Rounding can leave the target just past the final sum.
        last_positive
    }
}

/// Draw `count` parent indices independently, with replacement, with
/// probability proportional to each individual's weight.
pub fn select_parents<R: Rng + ?Sized>(
    scores: &[i64],
    count: usize,
    scaling: ScoreScaling,
    rng: &mut R,
) -> Vec<usize> {
    let wheel = RouletteWheel::new(scores, scaling);
    if wheel.is_empty() {
        return Vec::new();
    }
    if wheel.is_degenerate() {
        warn!(
            "All {} fitness weights are zero under {:?} scaling; selecting parents uniformly",
            wheel.len(),
            scaling
        );
    }

    (0..count).map(|_| wheel.spin(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    /// Selection probability of each individual.
    fn probabilities(wheel: &RouletteWheel) -> Vec<f64> {
        if wheel.is_degenerate() {
            return vec![1.0 / wheel.len() as f64; wheel.len()];
        }
        wheel.weights.iter().map(|w| w / wheel.total).collect()
    }

    #[test]
    fn test_frequencies_match_fitness_share() {
        let scores = [10, 30, 60];
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 100_000;
        let picks = select_parents(&scores, draws, ScoreScaling::Clamp, &mut rng);

        let mut counts = [0usize; 3];
        for i in picks {
            counts[i] += 1;
        }
        for (count, expected) in counts.iter().zip([0.1, 0.3, 0.6]) {
            let freq = *count as f64 / draws as f64;
            assert!(
                (freq - expected).abs() < 0.01,
                "frequency {} vs expected {}",
                freq,
                expected
            );
        }
    }

    #[test]
    fn test_zero_fitness_never_selected() {
        let scores = [0, 50, 50];
        let mut rng = StdRng::seed_from_u64(1);
        let picks = select_parents(&scores, 10_000, ScoreScaling::Clamp, &mut rng);
        let zero_count = picks.iter().filter(|&&i| i == 0).count();
        let peer_count = picks.iter().filter(|&&i| i == 1).count();
        assert_eq!(zero_count, 0);
        assert!(peer_count > zero_count);
    }

    #[test]
    fn test_zero_target_skips_leading_zero_weight() {
        let wheel = RouletteWheel::new(&[-5, 0, 7], ScoreScaling::Clamp);
        let mut rng = StepRng::new(0, 0);
        assert_eq!(wheel.spin(&mut rng), 2);
    }

    #[test]
    fn test_degenerate_falls_back_to_uniform() {
        let scores = [-20, -40, 0, -60];
        let wheel = RouletteWheel::new(&scores, ScoreScaling::Clamp);
        assert!(wheel.is_degenerate());
        assert_eq!(probabilities(&wheel), vec![0.25; 4]);

        let mut rng = StdRng::seed_from_u64(8);
        let picks = select_parents(&scores, 4_000, ScoreScaling::Clamp, &mut rng);
        let mut counts = [0usize; 4];
        for i in picks {
            counts[i] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "count {}", count);
        }
    }

    #[test]
    fn test_shift_scaling() {
        let wheel = RouletteWheel::new(&[-100, -50, 50], ScoreScaling::Shift);
        assert!(!wheel.is_degenerate());
        let probs = probabilities(&wheel);
        assert_eq!(probs[0], 0.0);
        assert!((probs[1] - 50.0 / 200.0).abs() < 1e-12);
        assert!((probs[2] - 150.0 / 200.0).abs() < 1e-12);
    }

    #[test]
    fn test_shift_equal_scores_degenerate() {
        let wheel = RouletteWheel::new(&[168, 168, 168], ScoreScaling::Shift);
        assert!(wheel.is_degenerate());
        let clamp = RouletteWheel::new(&[168, 168, 168], ScoreScaling::Clamp);
        assert!(!clamp.is_degenerate());
        assert_eq!(probabilities(&clamp), vec![1.0 / 3.0; 3]);
    }

    #[test]
    fn test_count_and_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let picks = select_parents(&[5, 1, 9, 3], 20, ScoreScaling::Clamp, &mut rng);
        assert_eq!(picks.len(), 20);
        assert!(picks.iter().all(|&i| i < 4));
        assert!(select_parents(&[], 5, ScoreScaling::Clamp, &mut rng).is_empty());
    }
}
