//! Deterministic per-trial and run-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each simulated trial gets its own independent `SmallRng` seeded by:
//!
//!   seed = master_seed XOR (subject * SUBJECT_MIX) XOR (trial * MIXING_CONSTANT)
//!
//! The mixing constants are 64-bit odd multipliers (the first is the
//! fractional part of the golden ratio), which spread consecutive IDs across
//! the seed space.  This means:
//!
//! - Trials never share RNG state, so they can run on any thread in any
//!   order and still produce the same draws.
//! - Appending trials to a dataset does not disturb the draws of existing
//!   trials.
//!
//! The simulation functions themselves are generic over `rand::Rng`, so a
//! caller may also pass `rand::thread_rng()` or any other source directly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Second odd multiplier so `(subject, trial)` and `(trial, subject)` differ.
const SUBJECT_MIX: u64 = 0xbf58_476d_1ce4_e5b9;

// ── TrialRng ──────────────────────────────────────────────────────────────────

/// Per-trial deterministic RNG.
///
/// Created on the worker that simulates the trial and dropped with it.
pub struct TrialRng(SmallRng);

impl TrialRng {
    /// Seed deterministically from the run's master seed, a subject and a
    /// row index (the trial's position in its input table).
    pub fn new(master_seed: u64, subject: u64, row: u64) -> Self {
        let seed = master_seed
            ^ subject.wrapping_add(1).wrapping_mul(SUBJECT_MIX)
            ^ row.wrapping_add(1).wrapping_mul(MIXING_CONSTANT);
        TrialRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types
    /// and the generic simulation functions.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG for sequential use.
///
/// If you need parallel randomness, give each worker its own [`TrialRng`]
/// or derive children with [`child`](Self::child).
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from operating-system entropy (non-reproducible).
    pub fn from_entropy() -> Self {
        SimRng(SmallRng::from_entropy())
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
    pub fn next_seed(&mut self) -> u64 {
        self.0.r#gen()
    }
}
