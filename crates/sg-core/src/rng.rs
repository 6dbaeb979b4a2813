//! Deterministic per-node and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each node gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (node_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive node IDs uniformly across the seed space.
//! Beacon and contention jitter drawn by one node therefore never depends on
//! how many draws another node made, and adding vehicles at the end of the
//! list does not disturb the jitter of existing ones.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::NodeId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── NodeRng ───────────────────────────────────────────────────────────────────

/// Per-node deterministic RNG used for protocol jitter.
pub struct NodeRng(SmallRng);

impl NodeRng {
    /// Seed deterministically from the run's global seed and a node ID.
    pub fn new(global_seed: u64, node: NodeId) -> Self {
        let seed = global_seed ^ (node.0 as u64).wrapping_mul(MIXING_CONSTANT);
        NodeRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Uniform jitter in `[lo_us, hi_us]` microseconds.  Returns `lo_us` when
    /// the range is empty.
    #[inline]
    pub fn jitter_us(&mut self, lo_us: u64, hi_us: u64) -> u64 {
        if hi_us <= lo_us {
            lo_us
        } else {
            self.0.gen_range(lo_us..=hi_us)
        }
    }
}

// ── NodeRngs ──────────────────────────────────────────────────────────────────

/// One [`NodeRng`] per node, indexed by `NodeId`.
///
/// Kept apart from the protocol instances so the simulation loop can borrow
/// a node mutably and its RNG mutably at the same time.
pub struct NodeRngs {
    pub inner: Vec<NodeRng>,
}

impl NodeRngs {
    /// Allocate and seed `count` per-node RNGs from `global_seed`.
    pub fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| NodeRng::new(global_seed, NodeId(i)))
            .collect();
        Self { inner }
    }

    /// Mutable reference to one node's RNG.
    #[inline]
    pub fn get_mut(&mut self, node: NodeId) -> &mut NodeRng {
        &mut self.inner[node.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (channel loss, scenario
/// generation).
///
/// Used only from the single-threaded event loop.  Parallel seed sweeps give
/// each run its own `SimRng`.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
