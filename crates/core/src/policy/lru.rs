//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the page that has gone untouched for the longest time.
//! Every hit restamps the frame's `accessed_at`, so the victim is simply the
//! occupied slot with the oldest stamp.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()` is O(F) over the pool's slots.
//! - **Space Complexity:** O(1)
//! - **Best Case:** Workloads with good temporal locality
//! - **Worst Case:** Cyclic scans larger than the frame pool (thrashing)

use super::{FrameSet, ReplacementPolicy, oldest_by};
use crate::common::SimError;
use crate::config::PolicyKind;

/// LRU Policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct LruPolicy;

impl ReplacementPolicy for LruPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }

    /// Returns the occupied slot with the smallest `accessed_at`.
    ///
    /// Ties go to the lowest slot index.
    fn select_victim(&mut self, frames: &mut dyn FrameSet) -> Result<usize, SimError> {
        oldest_by(frames, |meta| meta.accessed_at)
    }
}
