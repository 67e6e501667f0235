//! Deterministic Random Number Generation
//!
//! Puzzle generation reshuffles the category pool once per attempt, so the
//! only contract here is reproducibility: the same seed and the same input
//! list always yield the same permutation.
//!
//! Two generators are provided:
//! - [`DeterministicRng`]: Xorshift128+ seeded through SplitMix64. Pure integer
//!   arithmetic, identical on every platform. This is the default.
//! - [`sine_random`]: the legacy `frac(sin(s) * 10000)` generator, kept for
//!   parity with puzzles published before the switch. It depends on the
//!   platform `sin`, so it is only as portable as libm.

use serde::{Serialize, Deserialize};

/// Deterministic PRNG using Xorshift128+ algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG will produce the exact same sequence
/// of random numbers on any platform.
///
/// # Example
///
/// ```
/// use tcgdoku::core::rng::DeterministicRng;
///
/// let mut a = DeterministicRng::new(12345);
/// let mut b = DeterministicRng::new(12345);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, so consecutive
    /// seeds (`seed`, `seed + 1`, ...) still produce unrelated streams.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random integer in range [0, max).
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Simple modulo - slight bias for very large max, but acceptable
        (self.next_u64() % max as u64) as u32
    }

    /// Shuffle a slice in place using Fisher-Yates algorithm.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        let len = slice.len();
        for i in (1..len).rev() {
            let j = self.next_int((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Shuffle seed for one generation attempt.
///
/// The day seed is mixed before the attempt is folded in, so neighbouring
/// days (whose seeds differ by a few units) never share an attempt seed.
/// Results stay below 2^52, where `f64` holds every integer exactly, and
/// attempts sit 256 apart so sine draws for pools under 256 entries never
/// overlap.
pub fn attempt_seed(seed: u64, attempt: u32) -> u64 {
    let mut s = seed;
    (splitmix64(&mut s) >> 12) ^ ((attempt as u64) << 8)
}

// =============================================================================
// LEGACY SINE GENERATOR
// =============================================================================

/// Legacy pseudo-random value in `[0, 1)`: the fractional part of
/// `sin(seed) * 10000`.
#[inline]
pub fn sine_random(seed: u64) -> f64 {
    let x = (seed as f64).sin() * 10000.0;
    x - x.floor()
}

/// Fisher-Yates driven by [`sine_random`].
///
/// Walks `i` from the last index down to 1; the k-th swap draws from
/// `seed + k`.
fn sine_shuffle<T>(slice: &mut [T], seed: u64) {
    let mut current = seed;
    for i in (1..slice.len()).rev() {
        let j = (sine_random(current) * (i + 1) as f64).floor() as usize;
        // j <= i unless the float rounds up at the edge
        slice.swap(i, j.min(i));
        current = current.wrapping_add(1);
    }
}

// =============================================================================
// SHUFFLE STRATEGY
// =============================================================================

/// Which generator drives [`seeded_shuffle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleStrategy {
    /// Xorshift128+ (integer only, bit-for-bit portable).
    #[default]
    Xorshift,
    /// Legacy `frac(sin(s) * 10000)` generator.
    Sine,
}

impl ShuffleStrategy {
    /// Parse from a configuration string (`xorshift` or `sine`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "xorshift" => Some(Self::Xorshift),
            "sine" | "sin" => Some(Self::Sine),
            _ => None,
        }
    }
}

/// Return a seeded permutation of `items`.
///
/// The input is left untouched. Same `(items, seed, strategy)` always yields
/// the same output.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: u64, strategy: ShuffleStrategy) -> Vec<T> {
    let mut out = items.to_vec();
    match strategy {
        ShuffleStrategy::Xorshift => DeterministicRng::new(seed).shuffle(&mut out),
        ShuffleStrategy::Sine => sine_shuffle(&mut out, seed),
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        // Same seed must produce same sequence
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_known_values() {
        // These values must never change!
        // If they do, every previously published daily puzzle changes.
        let mut rng = DeterministicRng::new(42);
        assert_eq!(rng.next_u64(), 16629283624882167704);
        assert_eq!(rng.next_u64(), 1420492921613871959);
        assert_eq!(rng.next_u64(), 9768315062676884790);
    }

    #[test]
    fn test_next_int() {
        let mut rng = DeterministicRng::new(1234);

        for _ in 0..1000 {
            assert!(rng.next_int(100) < 100);
        }

        assert_eq!(rng.next_int(0), 0);
        assert_eq!(rng.next_int(1), 0);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let items: Vec<u32> = (0..40).collect();
        for strategy in [ShuffleStrategy::Xorshift, ShuffleStrategy::Sine] {
            let mut shuffled = seeded_shuffle(&items, 777, strategy);
            assert_ne!(shuffled, items, "{strategy:?} left the list untouched");
            shuffled.sort_unstable();
            assert_eq!(shuffled, items);
        }
    }

    #[test]
    fn test_shuffle_determinism() {
        let items: Vec<&str> = vec!["a", "b", "c", "d", "e", "f", "g", "h"];
        for strategy in [ShuffleStrategy::Xorshift, ShuffleStrategy::Sine] {
            assert_eq!(
                seeded_shuffle(&items, 2024, strategy),
                seeded_shuffle(&items, 2024, strategy)
            );
        }
    }

    #[test]
    fn test_consecutive_seeds_diverge() {
        let items: Vec<u32> = (0..30).collect();
        let base = 98_765u64;
        let mut seen = std::collections::BTreeSet::new();
        for attempt in 0..100 {
            seen.insert(seeded_shuffle(&items, attempt_seed(base, attempt), ShuffleStrategy::Xorshift));
        }
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_attempt_seeds_unique_across_neighbouring_days() {
        use crate::core::seed::daily_seed;
        use chrono::NaiveDate;

        let start = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let mut seen = std::collections::BTreeSet::new();
        for day in start.iter_days().take(30) {
            let seed = daily_seed(day) as u64;
            for attempt in 0..100 {
                let derived = attempt_seed(seed, attempt);
                assert!(derived < 1 << 52);
                assert!(seen.insert(derived), "{day} attempt {attempt} repeats an earlier seed");
            }
        }
    }

    #[test]
    fn test_attempt_seeds_keep_sine_windows_apart() {
        // A 40-item sine shuffle reads seed..seed+39; no two attempts share a draw.
        let mut draws = std::collections::BTreeSet::new();
        for attempt in 0..100 {
            let start = attempt_seed(1_162_559_499, attempt);
            for k in 0..40 {
                assert!(draws.insert(start + k));
            }
        }
    }

    #[test]
    fn test_sine_random_range() {
        for seed in 0..10_000u64 {
            let v = sine_random(seed);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_sine_shuffle_matches_published_puzzles() {
        // Orderings behind puzzles published before the switch to Xorshift.
        let letters: Vec<char> = "abcdefghij".chars().collect();
        let shuffle = |seed| seeded_shuffle(&letters, seed, ShuffleStrategy::Sine).into_iter().collect::<String>();
        assert_eq!(shuffle(1_162_559_499), "iadchgfjeb");
        assert_eq!(shuffle(12_345), "bhaefidgjc");
        assert!((sine_random(1_162_559_499) - 0.188538).abs() < 1e-6);
    }

    #[test]
    fn test_short_lists() {
        let empty: Vec<u8> = Vec::new();
        assert!(seeded_shuffle(&empty, 5, ShuffleStrategy::Xorshift).is_empty());
        assert_eq!(seeded_shuffle(&[9u8], 5, ShuffleStrategy::Sine), vec![9]);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(ShuffleStrategy::parse("XorShift"), Some(ShuffleStrategy::Xorshift));
        assert_eq!(ShuffleStrategy::parse(" sine "), Some(ShuffleStrategy::Sine));
        assert_eq!(ShuffleStrategy::parse("lcg"), None);
    }
}
