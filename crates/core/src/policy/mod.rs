//! Page Replacement Policies.
//!
//! Implements the victim-selection algorithms shared by every page-table scheme.
//! A table only calls into a policy once its frame pool (or, for the
//! hierarchical scheme, its subtree) is full. The policy sees the pool through
//! the [`FrameSet`] trait and returns the slot to evict.
//!
//! # Policies
//!
//! - `Fifo`: oldest load (`created_at`) first.
//! - `Lru`: oldest touch (`accessed_at`) first.
//! - `SecondChance`: clock sweep with a persistent cursor.
//! - `Random`: seeded uniform choice.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Second-Chance (clock) replacement policy.
pub mod clock;

/// Seeded random replacement policy.
pub mod random;

use std::fmt;

use crate::common::{SimError, Tick};
use crate::config::PolicyKind;

pub use clock::SecondChancePolicy;
pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;

/// Replacement metadata of one occupied frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameMeta {
    /// Clock tick at which the current page was loaded.
    pub created_at: Tick,
    /// Clock tick of the most recent access to the current page.
    pub accessed_at: Tick,
    /// Set on every hit; cleared on load and by the clock sweep.
    pub referenced: bool,
}

impl FrameMeta {
    /// Metadata of a page loaded at `clock`.
    pub const fn loaded(clock: Tick) -> Self {
        Self {
            created_at: clock,
            accessed_at: clock,
            referenced: false,
        }
    }

    /// Records a hit at `clock`.
    #[inline]
    pub const fn touch(&mut self, clock: Tick) {
        self.accessed_at = clock;
        self.referenced = true;
    }
}

/// A fixed-size pool of slots as seen by a replacement policy.
///
/// Slot indices are stable for the lifetime of the pool; an empty slot reports
/// `None`. Direct and inverted tables expose their frame array; a hierarchical
/// subtree exposes its second-level entries.
pub trait FrameSet {
    /// Total number of slots, occupied or not.
    fn slot_count(&self) -> usize;

    /// Metadata of the page in `slot`, or `None` if the slot is empty.
    fn meta(&self, slot: usize) -> Option<FrameMeta>;

    /// Clears the referenced flag of the page in `slot`.
    fn clear_referenced(&mut self, slot: usize);
}

/// Trait for page replacement policies.
///
/// Each table (and each hierarchical subtree) owns its own instance, so any
/// state a policy keeps between calls is scoped to that owner.
pub trait ReplacementPolicy: Send + fmt::Debug {
    /// The algorithm this instance implements.
    fn kind(&self) -> PolicyKind;

    /// Selects the slot to evict.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NoEvictionCandidate`] when `frames` holds no
    /// occupied slot.
    fn select_victim(&mut self, frames: &mut dyn FrameSet) -> Result<usize, SimError>;
}

/// Creates a fresh policy instance of the given kind.
///
/// `seed` only matters for [`PolicyKind::Random`].
pub fn build(kind: PolicyKind, seed: u64) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyKind::Fifo => Box::new(FifoPolicy),
        PolicyKind::Lru => Box::new(LruPolicy),
        PolicyKind::SecondChance => Box::new(SecondChancePolicy::new()),
        PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
    }
}

/// Returns the occupied slot with the smallest `key`, lowest slot on ties.
fn oldest_by(frames: &dyn FrameSet, key: impl Fn(&FrameMeta) -> Tick) -> Result<usize, SimError> {
    (0..frames.slot_count())
        .filter_map(|slot| frames.meta(slot).map(|meta| (slot, key(&meta))))
        .min_by_key(|&(_, tick)| tick)
        .map(|(slot, _)| slot)
        .ok_or(SimError::NoEvictionCandidate {
            slots: frames.slot_count(),
        })
}
