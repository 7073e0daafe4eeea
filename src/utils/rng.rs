//! Deterministic xorshift64* generator for reproducible synthetic data.
//!
//! Same seed → same sequence, so generated heatmaps are stable across runs
//! and testable.

use serde::{Deserialize, Serialize};

/// Largest λ handed to the Knuth sampler in one go
const POISSON_CHUNK: f64 = 500.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        // xorshift 的狀態不能為 0
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform f64 in [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Poisson sample using Knuth's multiplication method.
    ///
    /// `exp(-λ)` underflows past λ≈745, so larger rates are split into chunks
    /// of at most `POISSON_CHUNK` and the draws summed (Poisson is additive).
    pub fn poisson(&mut self, lambda: f64) -> u64 {
        if lambda <= 0.0 {
            return 0;
        }
        let mut remaining = lambda;
        let mut total = 0;
        while remaining > 0.0 {
            let chunk = remaining.min(POISSON_CHUNK);
            total += self.knuth_poisson(chunk);
            remaining -= chunk;
        }
        total
    }

    fn knuth_poisson(&mut self, lambda: f64) -> u64 {
        let limit = (-lambda).exp();
        let mut k = 0u64;
        let mut p = 1.0;
        loop {
            p *= self.next_f64();
            if p <= limit {
                return k;
            }
            k += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let mut rng = SeededRng::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_next_f64_in_unit_interval() {
        let mut rng = SeededRng::new(7);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_poisson_mean_close_to_lambda() {
        let mut rng = SeededRng::new(12345);
        let n = 2000;
        let total: u64 = (0..n).map(|_| rng.poisson(100.0)).sum();
        let mean = total as f64 / n as f64;
        assert!((mean - 100.0).abs() < 2.0, "mean was {}", mean);
    }

    #[test]
    fn test_poisson_mean_for_large_lambda() {
        for lambda in [1_000.0, 5_000.0, 10_000.0] {
            let mut rng = SeededRng::new(42);
            let n = 200;
            let total: u64 = (0..n).map(|_| rng.poisson(lambda)).sum();
            let mean = total as f64 / n as f64;
            // 200 次平均的標準差為 sqrt(λ/200)，最大約 7
            assert!((mean - lambda).abs() < lambda * 0.01, "lambda {} mean was {}", lambda, mean);
        }
    }

    #[test]
    fn test_small_lambda_uses_single_draw() {
        let mut chunked = SeededRng::new(9);
        let mut direct = SeededRng::new(9);
        for _ in 0..50 {
            assert_eq!(chunked.poisson(100.0), direct.knuth_poisson(100.0));
        }
    }
}
