//! Page-table organizations.
//!
//! This module holds the three translation schemes and what they share:
//! 1. **`PageTable`:** the access contract every scheme implements.
//! 2. **`AccessOutcome`:** what an access did (hit, load into a free frame, or eviction).
//! 3. **`FramePool`:** the frame-indexed array used by the direct and inverted schemes.
//!
//! Every scheme keeps the same invariants: a page is valid in at most one
//! entry, a frame is free exactly when no page maps to it, and on eviction the
//! old page is invalidated within the same call that validates the new one.

/// Single-level, page-indexed table.
pub mod direct;

/// Two-level table with lazily allocated second levels.
pub mod hierarchical;

/// Frame-indexed table searched by owning page.
pub mod inverted;

use crate::common::{FrameId, PageId, SimError, Tick};
use crate::config::Scheme;
use crate::policy::{FrameMeta, FrameSet};
use crate::stats::TableStats;

pub use direct::DirectPageTable;
pub use hierarchical::HierarchicalPageTable;
pub use inverted::InvertedPageTable;

/// Result of a single successful access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The page was resident in `frame`.
    Hit {
        /// Frame holding the page.
        frame: FrameId,
    },
    /// Page fault served from a free frame.
    Loaded {
        /// Frame the page was loaded into.
        frame: FrameId,
    },
    /// Page fault served by evicting `evicted` from `frame`.
    Replaced {
        /// Frame the page was loaded into.
        frame: FrameId,
        /// Page that previously occupied the frame.
        evicted: PageId,
    },
}

impl AccessOutcome {
    /// Whether the access faulted.
    pub const fn is_fault(&self) -> bool {
        !matches!(self, Self::Hit { .. })
    }

    /// Frame that holds the page after the access.
    pub const fn frame(&self) -> FrameId {
        match *self {
            Self::Hit { frame } | Self::Loaded { frame } | Self::Replaced { frame, .. } => frame,
        }
    }
}

/// Address-translation contract shared by every scheme.
pub trait PageTable: Send + std::fmt::Debug {
    /// Which organization this table models.
    fn scheme(&self) -> Scheme;

    /// Translates `page` at virtual time `clock`, loading it on a miss.
    ///
    /// The access counter is incremented before anything else, so a rejected
    /// access still counts as consumed.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the run: the table has detected a broken
    /// invariant or was handed a page it cannot index.
    fn access(&mut self, page: PageId, clock: Tick) -> Result<AccessOutcome, SimError>;

    /// Counters accumulated so far.
    fn stats(&self) -> TableStats;

    /// Currently valid pages, sorted ascending.
    fn resident_pages(&self) -> Vec<PageId>;

    /// Number of frames that currently hold a page.
    fn occupied_frames(&self) -> usize;

    /// Frame currently holding `page`, if it is resident.
    fn frame_of(&self, page: PageId) -> Option<FrameId>;

    /// Replacement metadata of `frame`, if it holds a page.
    fn frame_meta(&self, frame: FrameId) -> Option<FrameMeta>;
}

/// A frame's occupant: the page it holds plus its replacement metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEntry {
    /// Page loaded into the frame.
    pub page: PageId,
    /// Timestamps and referenced flag.
    pub meta: FrameMeta,
}

/// Fixed-size array of physical frames; `None` marks a free frame.
#[derive(Clone, Debug)]
pub struct FramePool {
    frames: Vec<Option<FrameEntry>>,
}

impl FramePool {
    /// Creates `num_frames` free frames.
    pub fn new(num_frames: usize) -> Self {
        Self {
            frames: vec![None; num_frames],
        }
    }

    /// Total number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the pool has no frames at all.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Occupant of `frame`, or `None` if it is free or out of range.
    pub fn get(&self, frame: FrameId) -> Option<&FrameEntry> {
        self.frames.get(frame).and_then(Option::as_ref)
    }

    /// Mutable occupant of `frame`.
    pub fn get_mut(&mut self, frame: FrameId) -> Option<&mut FrameEntry> {
        self.frames.get_mut(frame).and_then(Option::as_mut)
    }

    /// Lowest-numbered free frame.
    pub fn first_free(&self) -> Option<FrameId> {
        self.frames.iter().position(Option::is_none)
    }

    /// Frame holding `page`, found by scanning every occupied frame.
    pub fn find(&self, page: PageId) -> Option<FrameId> {
        self.frames
            .iter()
            .position(|slot| slot.is_some_and(|entry| entry.page == page))
    }

    /// Loads `page` into `frame` at `clock`, returning the previous occupant.
    pub fn load(&mut self, frame: FrameId, page: PageId, clock: Tick) -> Option<FrameEntry> {
        self.frames.get_mut(frame).and_then(|slot| {
            slot.replace(FrameEntry {
                page,
                meta: FrameMeta::loaded(clock),
            })
        })
    }

    /// Number of occupied frames.
    pub fn occupied(&self) -> usize {
        self.frames.iter().filter(|slot| slot.is_some()).count()
    }

    /// Iterates over occupants in frame order.
    pub fn residents(&self) -> impl Iterator<Item = (FrameId, &FrameEntry)> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(frame, slot)| slot.as_ref().map(|entry| (frame, entry)))
    }
}

impl FrameSet for FramePool {
    fn slot_count(&self) -> usize {
        self.frames.len()
    }

    fn meta(&self, slot: usize) -> Option<FrameMeta> {
        self.get(slot).map(|entry| entry.meta)
    }

    fn clear_referenced(&mut self, slot: usize) {
        if let Some(entry) = self.get_mut(slot) {
            entry.meta.referenced = false;
        }
    }
}
