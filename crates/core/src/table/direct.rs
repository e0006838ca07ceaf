//! Direct (dense) page table.
//!
//! A single-level table with one entry per virtual page, sized to the whole
//! address space. Translation is an array index; the cost is memory, since
//! the page array exists even for pages the trace never touches.
//!
//! Page-side entries record which frame a page lives in, and the frame-side
//! pool records which page each frame holds. A hit requires both sides to
//! agree; a disagreement means translation is already broken and is reported
//! as a [`SimError::ConsistencyViolation`].

use tracing::{debug, trace, warn};

use super::{AccessOutcome, FramePool, PageTable};
use crate::common::{FrameId, PageId, SimError, Tick};
use crate::config::Scheme;
use crate::policy::{FrameMeta, ReplacementPolicy};
use crate::stats::TableStats;

/// Page-indexed entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PageEntry {
    /// Frame the page was loaded into; meaningful only while `valid`.
    frame: FrameId,
    /// Whether the page is resident.
    valid: bool,
}

/// Single-level page table.
#[derive(Debug)]
pub struct DirectPageTable {
    pages: Vec<PageEntry>,
    frames: FramePool,
    policy: Box<dyn ReplacementPolicy>,
    accesses: u64,
    faults: u64,
}

impl DirectPageTable {
    /// Creates a table of `num_pages` invalid entries over `num_frames` free frames.
    pub fn new(num_pages: usize, num_frames: usize, policy: Box<dyn ReplacementPolicy>) -> Self {
        Self {
            pages: vec![PageEntry::default(); num_pages],
            frames: FramePool::new(num_frames),
            policy,
            accesses: 0,
            faults: 0,
        }
    }

    /// The frame-side view of the table.
    pub const fn frames(&self) -> &FramePool {
        &self.frames
    }

    /// Index of `page` in the page array.
    fn index(&self, page: PageId) -> Result<usize, SimError> {
        usize::try_from(page)
            .ok()
            .filter(|&idx| idx < self.pages.len())
            .ok_or(SimError::PageOutOfRange {
                page,
                pages: self.pages.len() as u64,
            })
    }
}

impl PageTable for DirectPageTable {
    fn scheme(&self) -> Scheme {
        Scheme::Direct
    }

    fn access(&mut self, page: PageId, clock: Tick) -> Result<AccessOutcome, SimError> {
        self.accesses += 1;
        let idx = self.index(page)?;

        let entry = self.pages[idx];
        if entry.valid {
            let frame = entry.frame;
            return match self.frames.get_mut(frame) {
                Some(resident) if resident.page == page => {
                    resident.meta.touch(clock);
                    trace!(page, frame, clock, "direct hit");
                    Ok(AccessOutcome::Hit { frame })
                }
                other => {
                    let owner = other.map(|resident| resident.page);
                    warn!(page, frame, ?owner, "direct table ownership mismatch");
                    Err(SimError::ConsistencyViolation { page, frame, owner })
                }
            };
        }

        self.faults += 1;

        if let Some(frame) = self.frames.first_free() {
            let _ = self.frames.load(frame, page, clock);
            self.pages[idx] = PageEntry { frame, valid: true };
            debug!(page, frame, clock, "direct fault, free frame");
            return Ok(AccessOutcome::Loaded { frame });
        }

        let frame = self.policy.select_victim(&mut self.frames)?;
        let evicted = self
            .frames
            .get(frame)
            .map(|resident| resident.page)
            .ok_or(SimError::NoEvictionCandidate {
                slots: self.frames.len(),
            })?;

        let _ = self.frames.load(frame, page, clock);
        if let Some(old) = usize::try_from(evicted)
            .ok()
            .and_then(|old| self.pages.get_mut(old))
        {
            old.valid = false;
        }
        self.pages[idx] = PageEntry { frame, valid: true };

        debug!(page, frame, evicted, clock, "direct fault, replaced");
        Ok(AccessOutcome::Replaced { frame, evicted })
    }

    fn stats(&self) -> TableStats {
        TableStats {
            accesses: self.accesses,
            faults: self.faults,
            capacity: self.pages.len() as u64,
        }
    }

    fn resident_pages(&self) -> Vec<PageId> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.valid)
            .map(|(page, _)| page as PageId)
            .collect()
    }

    fn occupied_frames(&self) -> usize {
        self.frames.occupied()
    }

    fn frame_of(&self, page: PageId) -> Option<FrameId> {
        let entry = self.pages.get(usize::try_from(page).ok()?)?;
        entry.valid.then_some(entry.frame)
    }

    fn frame_meta(&self, frame: FrameId) -> Option<FrameMeta> {
        self.frames.get(frame).map(|resident| resident.meta)
    }
}
