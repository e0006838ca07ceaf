//! Second-Chance (Clock) Replacement Policy.
//!
//! Frames are arranged in a circle and a hand sweeps over them. A frame whose
//! referenced flag is clear is evicted; a frame whose flag is set loses the
//! flag and is skipped, getting a second chance. The hand position survives
//! between calls, which is what makes the sweep amortized: restarting from
//! slot 0 on every fault turns the algorithm into something else.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()` is O(F) worst case, O(1) amortized.
//! - **Space Complexity:** O(1), a single cursor.
//! - **Degenerate Case:** When every frame is referenced, one full revolution
//!   clears all flags and the frame under the hand is taken (plain FIFO).

use super::{FrameSet, ReplacementPolicy};
use crate::common::SimError;
use crate::config::PolicyKind;

/// Second-Chance Policy state.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecondChancePolicy {
    /// Slot the next sweep starts from.
    hand: usize,
}

impl SecondChancePolicy {
    /// Creates a clock with its hand on slot 0.
    pub const fn new() -> Self {
        Self { hand: 0 }
    }

    /// Slot the next sweep will start from.
    pub const fn hand(&self) -> usize {
        self.hand
    }

    /// Returns the slot under the hand and advances the hand past it.
    #[inline]
    const fn advance(&mut self, slots: usize) -> usize {
        let slot = self.hand;
        self.hand = (self.hand + 1) % slots;
        slot
    }
}

impl ReplacementPolicy for SecondChancePolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::SecondChance
    }

    /// Sweeps from the hand, clearing referenced flags until an unreferenced
    /// frame is found.
    ///
    /// Empty slots are skipped. If a whole revolution finds nothing, the first
    /// occupied slot at or after the starting position is taken.
    fn select_victim(&mut self, frames: &mut dyn FrameSet) -> Result<usize, SimError> {
        let slots = frames.slot_count();
        if slots == 0 {
            return Err(SimError::NoEvictionCandidate { slots });
        }
        self.hand %= slots;

        let start = self.hand;
        loop {
            let slot = self.advance(slots);
            if let Some(meta) = frames.meta(slot) {
                if !meta.referenced {
                    return Ok(slot);
                }
                frames.clear_referenced(slot);
            }
            if self.hand == start {
                break;
            }
        }

        // Full revolution: every occupied frame has had its flag cleared.
        for _ in 0..slots {
            let slot = self.advance(slots);
            if frames.meta(slot).is_some() {
                return Ok(slot);
            }
        }
        Err(SimError::NoEvictionCandidate { slots })
    }
}
