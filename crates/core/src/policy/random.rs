//! Random Replacement Policy.
//!
//! This policy evicts an occupied frame chosen uniformly at random. The
//! generator is seeded once when the policy is built, so a run is fully
//! reproducible from its configuration.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{FrameSet, ReplacementPolicy};
use crate::common::SimError;
use crate::config::PolicyKind;

/// Random Policy state.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    /// Deterministically seeded generator.
    rng: StdRng,
}

impl RandomPolicy {
    /// Creates a new Random policy seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Random
    }

    /// Picks one of the occupied slots uniformly.
    fn select_victim(&mut self, frames: &mut dyn FrameSet) -> Result<usize, SimError> {
        let slots = frames.slot_count();
        let occupied: Vec<usize> = (0..slots)
            .filter(|&slot| frames.meta(slot).is_some())
            .collect();
        occupied
            .choose(&mut self.rng)
            .copied()
            .ok_or(SimError::NoEvictionCandidate { slots })
    }
}
