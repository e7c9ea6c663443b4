use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer in `[min, max]`. A reversed range is swapped.
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.gen_range(lo..=hi)
    }

    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.index(items.len());
        Some(items[idx])
    }

    /// Cumulative-sum draw proportional to `weights`.
    ///
    /// Empty or all-zero tables fall back to index 0.
    pub fn weighted_index(&mut self, weights: &[u32]) -> usize {
        let total: u64 = weights.iter().map(|w| *w as u64).sum();
        if total == 0 {
            return 0;
        }
        let mut threshold = self.rng.gen_range(0..total);
        for (idx, weight) in weights.iter().enumerate() {
            let weight = *weight as u64;
            if threshold < weight {
                return idx;
            }
            threshold -= weight;
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RngState::from_seed(7);
        let mut b = RngState::from_seed(7);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn range_inclusive_hits_both_ends() {
        let mut rng = RngState::from_seed(3);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let value = rng.range_inclusive(2, 5);
            assert!((2..=5).contains(&value));
            seen[(value - 2) as usize] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
        assert_eq!(rng.range_inclusive(4, 4), 4);
        let swapped = rng.range_inclusive(9, 6);
        assert!((6..=9).contains(&swapped));
    }

    #[test]
    fn weighted_index_degenerate_tables_fall_back_to_zero() {
        let mut rng = RngState::from_seed(11);
        assert_eq!(rng.weighted_index(&[]), 0);
        assert_eq!(rng.weighted_index(&[0, 0, 0]), 0);
    }

    #[test]
    fn weighted_index_skips_zero_weights() {
        let mut rng = RngState::from_seed(5);
        for _ in 0..200 {
            assert_eq!(rng.weighted_index(&[0, 0, 4, 0]), 2);
        }
    }

    #[test]
    fn weighted_index_tracks_weight_ratios() {
        let weights = [50u32, 35, 25, 15, 10, 3, 1];
        let total: u32 = weights.iter().sum();
        let draws = 20_000;
        let mut rng = RngState::from_seed(0xC0FFEE);
        let mut counts = [0u32; 7];
        for _ in 0..draws {
            counts[rng.weighted_index(&weights)] += 1;
        }
        for (idx, weight) in weights.iter().enumerate() {
            let expected = *weight as f64 / total as f64;
            let observed = counts[idx] as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.02,
                "symbol {idx}: observed {observed:.4} expected {expected:.4}"
            );
        }
    }
}
