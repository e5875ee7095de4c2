//! Seedable random source shared by every game module.
//!
//! [`RandomSource`] wraps a ChaCha20 stream and exposes the handful of primitives the
//! games need: uniform floats and integers, fair booleans, Fisher-Yates shuffles,
//! weighted-categorical draws and inverse-transform crash points.
//!
//! Instances are plain values. The application owns one for live play; the simulator
//! builds its own. Nothing in this crate keeps a process-wide generator.

use casino_types::ConfigError;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::fmt::Debug;

/// Deterministic (when seeded) uniform random source.
#[derive(Clone, Debug)]
pub struct RandomSource {
    rng: ChaCha20Rng,
    seed: Option<u64>,
}

impl RandomSource {
    /// Reproducible source: equal seeds yield identical draw sequences.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Source seeded from operating-system entropy, for live play.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
            seed: None,
        }
    }

    /// Seed this source was built from, if it was seeded explicitly.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Derive an independent, explicitly seeded child source.
    ///
    /// Consumes one draw from `self`, so forking is itself deterministic.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.rng.next_u64())
    }

    /// Uniform float in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer in `[0, bound)`. A zero bound yields `0`.
    pub fn uniform_int(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }

    /// Uniform index in `[0, len)`. A zero length yields `0`.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    /// Fair coin.
    pub fn boolean(&mut self) -> bool {
        self.rng.gen::<bool>()
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }

    /// Draw a key with probability proportional to its weight.
    ///
    /// Scans the entries subtracting weights from `uniform() * total` until the
    /// remainder drops to zero or below. If floating-point error leaves nothing selected
    /// the last key is returned. Returns `None` only for an empty slice.
    pub fn weighted_choice<'a, K>(&mut self, entries: &'a [(K, u32)]) -> Option<&'a K> {
        let (last, _) = entries.last()?;
        let total: f64 = entries.iter().map(|(_, weight)| f64::from(*weight)).sum();
        let mut remainder = self.uniform() * total;
        for (key, weight) in entries {
            remainder -= f64::from(*weight);
            if remainder <= 0.0 {
                return Some(key);
            }
        }
        Some(last)
    }

    /// Crash multiplier for one round (always `>= 1.0`).
    ///
    /// See [`crash_point_from_uniform`].
    pub fn crash_point(&mut self, house_edge: f64) -> f64 {
        let u = self.uniform();
        crash_point_from_uniform(u, house_edge)
    }
}

/// Inverse-transform crash point for a uniform draw `u` in `[0, 1)`.
///
/// With probability `house_edge` (`u < house_edge`) the round crashes instantly at
/// `1.0`. Otherwise the point is `(1 - house_edge) / (1 - u)`, which gives
/// `P(crash > x) = (1 - house_edge) / x` for every `x >= 1`. A player auto-cashing at
/// target `x` therefore returns `x * P(crash > x) = 1 - house_edge`, whatever `x` is.
pub fn crash_point_from_uniform(u: f64, house_edge: f64) -> f64 {
    if u < house_edge {
        return 1.0;
    }
    let point = (1.0 - house_edge) / (1.0 - u);
    // NaN (bad edge) and sub-1.0 rounding both collapse to an instant crash.
    point.max(1.0)
}

/// Ordered `(key, weight)` table validated at construction.
///
/// Entries keep declaration order so draws never depend on hash iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedTable<K> {
    entries: Vec<(K, u32)>,
    total: u64,
}

impl<K: Clone + PartialEq + Debug> WeightedTable<K> {
    /// Build a table, rejecting empty tables, zero weights and duplicate keys.
    pub fn new(entries: Vec<(K, u32)>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyWeights);
        }
        for (idx, (key, weight)) in entries.iter().enumerate() {
            if *weight == 0 {
                return Err(ConfigError::ZeroWeight {
                    key: format!("{key:?}"),
                });
            }
            if entries[..idx].iter().any(|(other, _)| other == key) {
                return Err(ConfigError::DuplicateKey {
                    key: format!("{key:?}"),
                });
            }
        }
        let total = entries.iter().map(|(_, weight)| u64::from(*weight)).sum();
        Ok(Self { entries, total })
    }

    /// Build from entries already known to be valid (compiled-in defaults).
    pub(crate) fn from_validated(entries: Vec<(K, u32)>) -> Self {
        let total = entries.iter().map(|(_, weight)| u64::from(*weight)).sum();
        Self { entries, total }
    }

    pub fn entries(&self) -> &[(K, u32)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// Weight of `key`, or `0` if absent.
    pub fn weight(&self, key: &K) -> u32 {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, weight)| *weight)
            .unwrap_or(0)
    }

    /// `weight(key) / total_weight()`.
    pub fn probability(&self, key: &K) -> f64 {
        f64::from(self.weight(key)) / self.total as f64
    }

    /// Draw one key.
    pub fn choose(&self, rng: &mut RandomSource) -> K {
        match rng.weighted_choice(&self.entries) {
            Some(key) => key.clone(),
            // Unreachable: construction rejects empty tables.
            None => self.entries[self.entries.len() - 1].0.clone(),
        }
    }
}
