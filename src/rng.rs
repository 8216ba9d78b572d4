//! Seeded pseudo-random source.
//!
//! The generator is mulberry32 over a 32-bit state. A 64-bit seed is folded
//! into that state as `(seed ^ (seed >> 32)) as u32`. The sequence for a given
//! seed is part of the registry contract: changing anything here changes every
//! published seed's output.

use thiserror::Error;

const STRING_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const FORK_SALT: u32 = 0x6A09_E667;
const TWO_POW_32: f64 = 4_294_967_296.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RngError {
    #[error("cannot pick from an empty selection")]
    EmptySelection,

    #[error("cannot pick from a selection whose weights sum to zero")]
    ZeroWeight,
}

/// Deterministic random source seeded from a `u64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: fold_seed(seed),
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform float in `[0, 1)`.
    pub fn float(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// Uniform integer in `[min, max]`. Bounds are swapped when reversed.
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = i128::from(hi) - i128::from(lo) + 1;
        let offset = (self.float() * span as f64).floor() as i128;
        (i128::from(lo) + offset.min(span - 1)) as i64
    }

    /// `true` with probability `p`, clamped to `[0, 1]`.
    pub fn bool(&mut self, p: f64) -> bool {
        let p = p.clamp(0.0, 1.0);
        self.float() < p
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, RngError> {
        if items.is_empty() {
            return Err(RngError::EmptySelection);
        }
        let index = self.int(0, items.len() as i64 - 1) as usize;
        Ok(&items[index])
    }

    /// Picks one item with probability proportional to its weight.
    ///
    /// Negative and non-finite weights count as zero.
    pub fn pick_weighted<'a, T>(&mut self, items: &'a [(T, f64)]) -> Result<&'a T, RngError> {
        if items.is_empty() {
            return Err(RngError::EmptySelection);
        }

        let mut cumulative = Vec::with_capacity(items.len());
        let mut total = 0.0;
        for (_, weight) in items {
            total += sanitize_weight(*weight);
            cumulative.push(total);
        }
        if total <= 0.0 {
            return Err(RngError::ZeroWeight);
        }

        let target = self.float() * total;
        let index = cumulative
            .iter()
            .position(|c| *c > target)
            .unwrap_or(items.len() - 1);
        Ok(&items[index].0)
    }

    /// Random lowercase alphanumeric string of `len` characters.
    pub fn string(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| {
                let index = self.int(0, STRING_ALPHABET.len() as i64 - 1) as usize;
                STRING_ALPHABET[index] as char
            })
            .collect()
    }

    /// Derives a child generator without advancing `self`.
    ///
    /// The state is a Weyl counter, so the child walks the same cycle as the
    /// parent from a pseudo-random offset. Streams only overlap if a caller
    /// draws past that offset, which for 32-bit states is unlikely but not
    /// ruled out.
    pub fn fork(&self) -> SeededRng {
        let mut state = fmix32(self.state ^ FORK_SALT);
        if state == self.state {
            state ^= 1;
        }
        SeededRng { state }
    }
}

fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// murmur3 finalizer.
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SeededRng::new(1);
        let mut b = SeededRng::new(2);
        let xs: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_known_mulberry32_output() {
        // mulberry32(0) first output
        let mut rng = SeededRng::new(0);
        assert_eq!(rng.next_u32(), 1_144_304_738);
    }

    #[test]
    fn test_seed_folding_uses_high_bits() {
        assert_ne!(SeededRng::new(1).state(), SeededRng::new(1 << 32 | 2).state());
        assert_eq!(SeededRng::new(7).state(), 7);
    }

    #[test]
    fn test_float_range() {
        let mut rng = SeededRng::new(9);
        for _ in 0..1000 {
            let f = rng.float();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn test_int_inclusive_bounds() {
        let mut rng = SeededRng::new(5);
        let mut seen = [false; 3];
        for _ in 0..500 {
            let v = rng.int(1, 3);
            assert!((1..=3).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(rng.int(4, 4), 4);
    }

    #[test]
    fn test_int_full_i64_range() {
        let mut rng = SeededRng::new(1);
        for _ in 0..1000 {
            rng.int(i64::MIN, i64::MAX);
        }
        let mut rng = SeededRng::new(1);
        let v = rng.int(i64::MAX, i64::MAX - 1);
        assert!(v == i64::MAX || v == i64::MAX - 1);
        assert_eq!(rng.int(i64::MIN, i64::MIN), i64::MIN);
    }

    #[test]
    fn test_bool_extremes() {
        let mut rng = SeededRng::new(3);
        assert!((0..100).all(|_| !rng.bool(0.0)));
        assert!((0..100).all(|_| rng.bool(1.0)));
    }

    #[test]
    fn test_pick_empty_fails() {
        let mut rng = SeededRng::new(1);
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), Err(RngError::EmptySelection));
    }

    #[test]
    fn test_pick_weighted_errors() {
        let mut rng = SeededRng::new(1);
        let empty: [(u8, f64); 0] = [];
        assert_eq!(rng.pick_weighted(&empty), Err(RngError::EmptySelection));
        assert_eq!(
            rng.pick_weighted(&[("a", 0.0), ("b", -1.0)]),
            Err(RngError::ZeroWeight)
        );
    }

    #[test]
    fn test_pick_weighted_never_picks_zero_weight() {
        let mut rng = SeededRng::new(77);
        let items = [("never", 0.0), ("always", 2.0)];
        for _ in 0..200 {
            assert_eq!(*rng.pick_weighted(&items).unwrap(), "always");
        }
    }

    #[test]
    fn test_pick_weighted_converges_to_weights() {
        let mut rng = SeededRng::new(2024);
        let items = [("a", 1.0), ("b", 3.0)];
        let draws = 20_000;
        let hits = (0..draws)
            .filter(|_| *rng.pick_weighted(&items).unwrap() == "b")
            .count();
        let ratio = hits as f64 / draws as f64;
        assert!((ratio - 0.75).abs() < 0.02, "ratio was {ratio}");
    }

    #[test]
    fn test_string_alphabet_and_length() {
        let mut rng = SeededRng::new(11);
        let s = rng.string(16);
        assert_eq!(s.len(), 16);
        assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_eq!(rng.string(0), "");
    }

    #[test]
    fn test_fork_does_not_advance_parent() {
        let parent = SeededRng::new(99);
        let before = parent.clone();
        let _child = parent.fork();
        assert_eq!(parent, before);
    }

    #[test]
    fn test_fork_is_deterministic_and_independent() {
        let parent = SeededRng::new(99);
        let mut a = parent.fork();
        let mut b = parent.fork();
        assert_eq!(a.next_u32(), b.next_u32());

        let mut p = parent.clone();
        let mut c = parent.fork();
        let ps: Vec<u32> = (0..8).map(|_| p.next_u32()).collect();
        let cs: Vec<u32> = (0..8).map(|_| c.next_u32()).collect();
        assert_ne!(ps, cs);
    }
}
