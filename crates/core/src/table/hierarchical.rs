//! Two-level hierarchical page table.
//!
//! A page number splits into a first-level index (`page / l2_size`) and a
//! second-level index (`page % l2_size`). The first level is allocated up
//! front; a second-level table is only created the first time a page in its
//! range is touched, so sparse address spaces cost little memory.
//!
//! Each second-level table is an independently managed subtree: it owns the
//! replacement metadata of its pages and its own policy instance, so FIFO and
//! LRU ordering and the clock hand are all scoped to the subtree. Physical
//! frames come from a single pool shared by the whole table:
//!
//! - a fault takes the lowest free frame while any is left;
//! - once the pool is full, the faulting subtree evicts one of its own pages;
//! - if the faulting subtree holds no page at all, a table-level policy picks
//!   the victim across the whole pool.

use tracing::{debug, trace, warn};

use super::{AccessOutcome, PageTable};
use crate::common::{FrameId, PageId, SimError, Tick};
use crate::config::{PolicyKind, Scheme};
use crate::policy::{self, FrameMeta, FrameSet, ReplacementPolicy};
use crate::stats::TableStats;

/// Second-level entry of a resident page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LeafEntry {
    /// Physical frame bound to the page.
    frame: FrameId,
    /// Replacement metadata, scoped to the subtree.
    meta: FrameMeta,
}

/// Entries of one second-level table; `None` marks an invalid entry.
#[derive(Clone, Debug)]
struct LeafTable {
    entries: Vec<Option<LeafEntry>>,
    resident: usize,
}

impl FrameSet for LeafTable {
    fn slot_count(&self) -> usize {
        self.entries.len()
    }

    fn meta(&self, slot: usize) -> Option<FrameMeta> {
        self.entries.get(slot).copied().flatten().map(|e| e.meta)
    }

    fn clear_referenced(&mut self, slot: usize) {
        if let Some(Some(entry)) = self.entries.get_mut(slot) {
            entry.meta.referenced = false;
        }
    }
}

/// A second-level table together with its replacement state.
#[derive(Debug)]
struct Subtree {
    leaves: LeafTable,
    policy: Box<dyn ReplacementPolicy>,
}

/// Frame-pool view used when a victim has to come from another subtree.
///
/// Slot `n` is physical frame `n`; metadata is read from the subtree that
/// owns the frame's page.
struct PoolView<'a> {
    owners: &'a [Option<PageId>],
    directory: &'a mut [Option<Subtree>],
    l2_size: u64,
}

impl PoolView<'_> {
    fn leaf(&self, slot: usize) -> Option<&LeafEntry> {
        let page = (*self.owners.get(slot)?)?;
        let (l1, l2) = split(page, self.l2_size);
        self.directory.get(l1)?.as_ref()?.leaves.entries.get(l2)?.as_ref()
    }
}

impl FrameSet for PoolView<'_> {
    fn slot_count(&self) -> usize {
        self.owners.len()
    }

    fn meta(&self, slot: usize) -> Option<FrameMeta> {
        self.leaf(slot).map(|entry| entry.meta)
    }

    fn clear_referenced(&mut self, slot: usize) {
        let Some(Some(page)) = self.owners.get(slot).copied() else {
            return;
        };
        let (l1, l2) = split(page, self.l2_size);
        if let Some(Some(subtree)) = self.directory.get_mut(l1) {
            if let Some(Some(entry)) = subtree.leaves.entries.get_mut(l2) {
                entry.meta.referenced = false;
            }
        }
    }
}

/// Splits a page number into (first-level, second-level) indices.
#[inline]
const fn split(page: PageId, l2_size: u64) -> (usize, usize) {
    ((page / l2_size) as usize, (page % l2_size) as usize)
}

/// Two-level page table.
#[derive(Debug)]
pub struct HierarchicalPageTable {
    /// First level; `Some` marks a present second-level table.
    directory: Vec<Option<Subtree>>,
    l2_size: u64,
    /// Owning page of every physical frame.
    owners: Vec<Option<PageId>>,
    kind: PolicyKind,
    seed: u64,
    /// Table-level policy for cross-subtree eviction.
    pool_policy: Box<dyn ReplacementPolicy>,
    allocated: usize,
    accesses: u64,
    faults: u64,
}

impl HierarchicalPageTable {
    /// Creates a table with `l1_size` absent first-level entries over
    /// `num_frames` free frames.
    ///
    /// Every subtree gets its own `kind` policy when it is allocated; Random
    /// subtrees derive their seed from `seed` and their first-level index.
    pub fn new(
        l1_size: usize,
        l2_size: usize,
        num_frames: usize,
        kind: PolicyKind,
        seed: u64,
    ) -> Self {
        let mut directory = Vec::with_capacity(l1_size);
        directory.resize_with(l1_size, || None);
        Self {
            directory,
            l2_size: l2_size.max(1) as u64,
            owners: vec![None; num_frames],
            kind,
            seed,
            pool_policy: policy::build(kind, seed),
            allocated: 0,
            accesses: 0,
            faults: 0,
        }
    }

    /// Number of second-level tables allocated so far.
    pub const fn allocated_subtrees(&self) -> usize {
        self.allocated
    }

    /// Whether the second-level table for first-level index `l1` exists.
    pub fn is_present(&self, l1: usize) -> bool {
        self.directory.get(l1).is_some_and(Option::is_some)
    }

    /// Number of pages resident in the subtree at first-level index `l1`.
    pub fn subtree_residents(&self, l1: usize) -> usize {
        self.directory
            .get(l1)
            .and_then(Option::as_ref)
            .map_or(0, |subtree| subtree.leaves.resident)
    }

    /// Evicts a page from another subtree to make room, returning
    /// `(frame, evicted_page)`.
    fn evict_across_pool(&mut self) -> Result<(FrameId, PageId), SimError> {
        let mut view = PoolView {
            owners: &self.owners,
            directory: &mut self.directory,
            l2_size: self.l2_size,
        };
        let frame = self.pool_policy.select_victim(&mut view)?;

        let evicted = self
            .owners
            .get(frame)
            .copied()
            .flatten()
            .ok_or(SimError::NoEvictionCandidate {
                slots: self.owners.len(),
            })?;
        let (l1, l2) = split(evicted, self.l2_size);
        let donor = self
            .directory
            .get_mut(l1)
            .and_then(Option::as_mut)
            .ok_or(SimError::ConsistencyViolation {
                page: evicted,
                frame,
                owner: None,
            })?;
        match donor.leaves.entries.get_mut(l2).and_then(Option::take) {
            Some(entry) if entry.frame == frame => {
                donor.leaves.resident -= 1;
                Ok((frame, evicted))
            }
            other => {
                warn!(page = evicted, frame, "pool owner has no matching leaf");
                Err(SimError::ConsistencyViolation {
                    page: evicted,
                    frame,
                    owner: other.and_then(|entry| self.owners.get(entry.frame).copied().flatten()),
                })
            }
        }
    }
}

impl PageTable for HierarchicalPageTable {
    fn scheme(&self) -> Scheme {
        Scheme::Hierarchical
    }

    fn access(&mut self, page: PageId, clock: Tick) -> Result<AccessOutcome, SimError> {
        self.accesses += 1;

        let (l1, l2) = split(page, self.l2_size);
        if l1 >= self.directory.len() {
            return Err(SimError::PageOutOfRange {
                page,
                pages: self.directory.len() as u64 * self.l2_size,
            });
        }

        if self.directory[l1].is_none() {
            let seed = self.seed.wrapping_add(l1 as u64 + 1);
            self.directory[l1] = Some(Subtree {
                leaves: LeafTable {
                    entries: vec![None; self.l2_size as usize],
                    resident: 0,
                },
                policy: policy::build(self.kind, seed),
            });
            self.allocated += 1;
            debug!(l1, "allocated second-level table");
        }

        if let Some(Some(subtree)) = self.directory.get_mut(l1) {
            if let Some(Some(entry)) = subtree.leaves.entries.get_mut(l2) {
                let frame = entry.frame;
                let owner = self.owners.get(frame).copied().flatten();
                if owner != Some(page) {
                    warn!(page, frame, ?owner, "hierarchical table ownership mismatch");
                    return Err(SimError::ConsistencyViolation { page, frame, owner });
                }
                entry.meta.touch(clock);
                trace!(page, frame, clock, "hierarchical hit");
                return Ok(AccessOutcome::Hit { frame });
            }
        }

        self.faults += 1;

        let (frame, evicted) = if let Some(free) = self.owners.iter().position(Option::is_none) {
            (free, None)
        } else if self.subtree_residents(l1) > 0 {
            let Some(Some(subtree)) = self.directory.get_mut(l1) else {
                return Err(SimError::NoEvictionCandidate { slots: 0 });
            };
            let slot = subtree.policy.select_victim(&mut subtree.leaves)?;
            let victim = subtree
                .leaves
                .entries
                .get_mut(slot)
                .and_then(Option::take)
                .ok_or(SimError::NoEvictionCandidate {
                    slots: subtree.leaves.entries.len(),
                })?;
            subtree.leaves.resident -= 1;
            (victim.frame, Some(l1 as u64 * self.l2_size + slot as u64))
        } else {
            let (frame, evicted) = self.evict_across_pool()?;
            (frame, Some(evicted))
        };

        self.owners[frame] = Some(page);
        if let Some(Some(subtree)) = self.directory.get_mut(l1) {
            subtree.leaves.entries[l2] = Some(LeafEntry {
                frame,
                meta: FrameMeta::loaded(clock),
            });
            subtree.leaves.resident += 1;
        }

        match evicted {
            Some(evicted) => {
                debug!(page, frame, evicted, clock, "hierarchical fault, replaced");
                Ok(AccessOutcome::Replaced { frame, evicted })
            }
            None => {
                debug!(page, frame, clock, "hierarchical fault, free frame");
                Ok(AccessOutcome::Loaded { frame })
            }
        }
    }

    fn stats(&self) -> TableStats {
        TableStats {
            accesses: self.accesses,
            faults: self.faults,
            capacity: self.directory.len() as u64 + self.allocated as u64 * self.l2_size,
        }
    }

    fn resident_pages(&self) -> Vec<PageId> {
        let mut pages = Vec::new();
        for (l1, subtree) in self.directory.iter().enumerate() {
            let Some(subtree) = subtree else { continue };
            for (l2, entry) in subtree.leaves.entries.iter().enumerate() {
                if entry.is_some() {
                    pages.push(l1 as u64 * self.l2_size + l2 as u64);
                }
            }
        }
        pages
    }

    fn occupied_frames(&self) -> usize {
        self.owners.iter().filter(|owner| owner.is_some()).count()
    }

    fn frame_of(&self, page: PageId) -> Option<FrameId> {
        let (l1, l2) = split(page, self.l2_size);
        let entry = self.directory.get(l1)?.as_ref()?.leaves.entries.get(l2)?.as_ref()?;
        Some(entry.frame)
    }

    fn frame_meta(&self, frame: FrameId) -> Option<FrameMeta> {
        let page = (*self.owners.get(frame)?)?;
        let (l1, l2) = split(page, self.l2_size);
        let entry = self.directory.get(l1)?.as_ref()?.leaves.entries.get(l2)?.as_ref()?;
        Some(entry.meta)
    }
}
