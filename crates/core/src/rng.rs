//! RNG module - shuffle-based random sources
//!
//! Search order is randomized through [`RandomSource`], which callers pick
//! explicitly:
//!
//! - [`LcgRandom`]: a linear congruential generator for reproducible runs
//! - [`SystemRandom`]: thread-local entropy from the `rand` crate

use std::ops::Range;

use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Capability to draw uniform integers and permute index sequences.
pub trait RandomSource {
    /// Uniform value in `range`. Panics if the range is empty.
    fn uniform_int(&mut self, range: Range<usize>) -> usize;

    /// Permute `items` in place (Fisher-Yates).
    fn shuffle(&mut self, items: &mut [usize]) {
        for i in (1..items.len()).rev() {
            let j = self.uniform_int(0..i + 1);
            items.swap(i, j);
        }
    }

    /// A shuffled copy of `0..len`.
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut items: Vec<usize> = (0..len).collect();
        self.shuffle(&mut items);
        items
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn uniform_int(&mut self, range: Range<usize>) -> usize {
        (**self).uniform_int(range)
    }

    fn shuffle(&mut self, items: &mut [usize]) {
        (**self).shuffle(items)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform_int(&mut self, range: Range<usize>) -> usize {
        (**self).uniform_int(range)
    }

    fn shuffle(&mut self, items: &mut [usize]) {
        (**self).shuffle(items)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses the glibc constants with a 2^31 modulus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcgRandom {
    state: u64,
}

impl LcgRandom {
    const MULTIPLIER: u64 = 1_103_515_245;
    const INCREMENT: u64 = 12_345;
    const MODULUS: u64 = 0x8000_0000;

    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % Self::MODULUS,
        }
    }

    /// Generate next value in `[0, 2^31)`
    pub fn next_u32(&mut self) -> u32 {
        self.state = (self.state * Self::MULTIPLIER + Self::INCREMENT) % Self::MODULUS;
        self.state as u32
    }

    /// Current generator state; `LcgRandom::new(rng.state())` continues the sequence.
    pub fn state(&self) -> u64 {
        self.state
    }
}

impl RandomSource for LcgRandom {
    fn uniform_int(&mut self, range: Range<usize>) -> usize {
        assert!(!range.is_empty(), "uniform_int on empty range");
        let span = (range.end - range.start) as u64;
        range.start + (self.next_u32() as u64 % span) as usize
    }
}

/// Platform entropy; every run differs.
#[derive(Debug, Clone, Default)]
pub struct SystemRandom {
    rng: ThreadRng,
}

impl SystemRandom {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl RandomSource for SystemRandom {
    fn uniform_int(&mut self, range: Range<usize>) -> usize {
        self.rng.random_range(range)
    }

    fn shuffle(&mut self, items: &mut [usize]) {
        items.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_state_resumes_sequence() {
        let mut rng = LcgRandom::new(99);
        for _ in 0..5 {
            rng.next_u32();
        }
        let mut resumed = LcgRandom::new(rng.state());
        for _ in 0..10 {
            assert_eq!(resumed.next_u32(), rng.next_u32());
        }
    }

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = LcgRandom::new(12345);
        let mut rng2 = LcgRandom::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = LcgRandom::new(12345);
        let mut rng2 = LcgRandom::new(54321);
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_rng_matches_glibc_sequence() {
        let mut rng = LcgRandom::new(1);
        assert_eq!(rng.next_u32(), 1_103_527_590);
    }

    #[test]
    fn test_uniform_int_in_range() {
        let mut rng = LcgRandom::new(7);
        for _ in 0..1000 {
            let v = rng.uniform_int(3..9);
            assert!((3..9).contains(&v));
        }
    }

    #[test]
    fn test_permutation_is_complete() {
        let mut seeded = LcgRandom::new(99);
        let mut system = SystemRandom::new();

        for rng in [&mut seeded as &mut dyn RandomSource, &mut system] {
            let mut perm = rng.permutation(10);
            perm.sort_unstable();
            assert_eq!(perm, (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_seeded_permutations_repeat() {
        let a = LcgRandom::new(2024).permutation(7);
        let b = LcgRandom::new(2024).permutation(7);
        assert_eq!(a, b);
    }
}
