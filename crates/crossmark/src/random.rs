//! Injectable uniform randomness.
//!
//! Every random decision in the crate draws from a [`UniformSource`], so
//! tests can script exact sample sequences and assert branch selection.

use rand::Rng;
use std::collections::VecDeque;

/// Provider of uniform samples in `[0, 1)`.
pub trait UniformSource {
    /// Draws one sample in `[0, 1)`.
    fn sample(&mut self) -> f64;

    /// Bernoulli trial: consumes one sample and passes when it is below `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.sample() < p
    }

    /// Picks one item uniformly, consuming one sample.
    ///
    /// Returns `None` for an empty slice without consuming anything.
    fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.sample() * items.len() as f64) as usize;
        items.get(index.min(items.len() - 1)).copied()
    }

    /// Draws a value uniformly from `[low, high]`, consuming one sample.
    fn between(&mut self, low: f64, high: f64) -> f64 {
        low + self.sample() * (high - low)
    }
}

/// Adapter turning any [`rand::Rng`] into a [`UniformSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    /// Wraps a generator.
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: Rng> UniformSource for RngSource<R> {
    fn sample(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// An empty list yields `0.0` forever.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    samples: VecDeque<f64>,
    drawn: usize,
}

impl SequenceSource {
    /// Creates a source replaying `samples` in order.
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            drawn: 0,
        }
    }

    /// Number of samples consumed so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl UniformSource for SequenceSource {
    fn sample(&mut self) -> f64 {
        self.drawn += 1;
        match self.samples.pop_front() {
            Some(value) => {
                self.samples.push_back(value);
                value
            }
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sequence_cycles_and_counts() {
        let mut source = SequenceSource::new([0.1, 0.9]);
        assert_eq!(source.sample(), 0.1);
        assert_eq!(source.sample(), 0.9);
        assert_eq!(source.sample(), 0.1);
        assert_eq!(source.drawn(), 3);
    }

    #[test]
    fn test_chance_is_strictly_below() {
        let mut source = SequenceSource::new([0.5]);
        assert!(!source.chance(0.5));
        assert!(source.chance(0.51));
    }

    #[test]
    fn test_pick_clamps_to_last_item() {
        let mut source = SequenceSource::new([0.0, 0.99, 1.0]);
        let items = [10, 20, 30];
        assert_eq!(source.pick(&items), Some(10));
        assert_eq!(source.pick(&items), Some(30));
        assert_eq!(source.pick(&items), Some(30));
        assert_eq!(source.pick::<u8>(&[]), None);
        assert_eq!(source.drawn(), 3);
    }

    #[test]
    fn test_rng_source_stays_in_unit_interval() {
        let mut source = RngSource::new(StdRng::seed_from_u64(7));
        for _ in 0..1000 {
            let u = source.sample();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
