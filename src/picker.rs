//! Sources of randomness for proxy selection.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses an index into a non-empty candidate list.
///
/// Implementations must return a value in `0..len`. `len` is never zero.
pub trait Picker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform random picker backed by a generator seeded once at construction.
pub struct RandomPicker {
    rng: Mutex<StdRng>,
}

impl RandomPicker {
    /// Create a picker whose sequence is fully determined by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Create a picker seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl Picker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        self.rng.lock().random_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_stay_in_range() {
        let picker = RandomPicker::from_os_rng();
        for len in 1..20 {
            for _ in 0..50 {
                assert!(picker.pick(len) < len);
            }
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = RandomPicker::seeded(42);
        let b = RandomPicker::seeded(42);
        let seq_a: Vec<usize> = (0..32).map(|_| a.pick(10)).collect();
        let seq_b: Vec<usize> = (0..32).map(|_| b.pick(10)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn single_element_always_zero() {
        let picker = RandomPicker::seeded(7);
        assert!((0..10).all(|_| picker.pick(1) == 0));
    }
}
