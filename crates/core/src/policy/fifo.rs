//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the page that has been resident the longest, regardless
//! of how recently it was accessed. Load order comes from each frame's
//! `created_at` stamp, so the policy itself is stateless.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()` is O(F) over the pool's slots.
//! - **Space Complexity:** O(1)
//! - **Best Case:** Streaming accesses where all pages have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (evicts hot pages)

use super::{FrameSet, ReplacementPolicy, oldest_by};
use crate::common::SimError;
use crate::config::PolicyKind;

/// FIFO Policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct FifoPolicy;

impl ReplacementPolicy for FifoPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Fifo
    }

    /// Returns the occupied slot with the smallest `created_at`.
    ///
    /// Ties go to the lowest slot index.
    fn select_victim(&mut self, frames: &mut dyn FrameSet) -> Result<usize, SimError> {
        oldest_by(frames, |meta| meta.created_at)
    }
}
