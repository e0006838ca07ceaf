//! Inverted page table.
//!
//! The table has one entry per physical frame instead of one per virtual
//! page. Its size tracks physical memory, which is what makes it attractive
//! for huge address spaces, but there is no page-indexed structure: finding a
//! page means scanning every frame for its owner.

use tracing::{debug, trace};

use super::{AccessOutcome, FramePool, PageTable};
use crate::common::{FrameId, PageId, SimError, Tick};
use crate::config::Scheme;
use crate::policy::{FrameMeta, ReplacementPolicy};
use crate::stats::TableStats;

/// Frame-indexed page table.
#[derive(Debug)]
pub struct InvertedPageTable {
    frames: FramePool,
    policy: Box<dyn ReplacementPolicy>,
    accesses: u64,
    faults: u64,
}

impl InvertedPageTable {
    /// Creates a table of `num_frames` free entries.
    pub fn new(num_frames: usize, policy: Box<dyn ReplacementPolicy>) -> Self {
        Self {
            frames: FramePool::new(num_frames),
            policy,
            accesses: 0,
            faults: 0,
        }
    }

    /// The table's entries.
    pub const fn frames(&self) -> &FramePool {
        &self.frames
    }
}

impl PageTable for InvertedPageTable {
    fn scheme(&self) -> Scheme {
        Scheme::Inverted
    }

    fn access(&mut self, page: PageId, clock: Tick) -> Result<AccessOutcome, SimError> {
        self.accesses += 1;

        if let Some(frame) = self.frames.find(page) {
            if let Some(resident) = self.frames.get_mut(frame) {
                resident.meta.touch(clock);
            }
            trace!(page, frame, clock, "inverted hit");
            return Ok(AccessOutcome::Hit { frame });
        }

        self.faults += 1;

        if let Some(frame) = self.frames.first_free() {
            let _ = self.frames.load(frame, page, clock);
            debug!(page, frame, clock, "inverted fault, free frame");
            return Ok(AccessOutcome::Loaded { frame });
        }

        let frame = self.policy.select_victim(&mut self.frames)?;
        let evicted = self
            .frames
            .load(frame, page, clock)
            .map(|old| old.page)
            .ok_or(SimError::NoEvictionCandidate {
                slots: self.frames.len(),
            })?;

        debug!(page, frame, evicted, clock, "inverted fault, replaced");
        Ok(AccessOutcome::Replaced { frame, evicted })
    }

    fn stats(&self) -> TableStats {
        TableStats {
            accesses: self.accesses,
            faults: self.faults,
            capacity: self.frames.len() as u64,
        }
    }

    fn resident_pages(&self) -> Vec<PageId> {
        let mut pages: Vec<PageId> = self.frames.residents().map(|(_, r)| r.page).collect();
        pages.sort_unstable();
        pages
    }

    fn occupied_frames(&self) -> usize {
        self.frames.occupied()
    }

    fn frame_of(&self, page: PageId) -> Option<FrameId> {
        self.frames.find(page)
    }

    fn frame_meta(&self, frame: FrameId) -> Option<FrameMeta> {
        self.frames.get(frame).map(|resident| resident.meta)
    }
}
