//! Simulation error definitions.
//!
//! Every error raised by the core is fatal to the run that produced it. A
//! translation table that reports one of these has already broken, or is about
//! to break, one of its invariants, so nothing retries or recovers: the error
//! travels back to the driver, which stops the trace.

use thiserror::Error;

use super::addr::{FrameId, PageId};

/// Fatal errors of the page-table simulation core.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// A page-side entry and the frame it points at disagree about ownership.
    #[error("consistency violation: page {page} maps to frame {frame}, but frame {frame} holds {owner:?}")]
    ConsistencyViolation {
        /// The page being translated.
        page: PageId,
        /// The frame recorded in the page's entry.
        frame: FrameId,
        /// The page the frame actually holds, if any.
        owner: Option<PageId>,
    },

    /// The configured replacement policy name is not implemented.
    #[error("unknown replacement policy `{0}` (expected fifo, lru, 2a or random)")]
    UnknownPolicy(String),

    /// Victim selection ran over a full pool and found nothing to evict.
    #[error("no eviction candidate among {slots} slots")]
    NoEvictionCandidate {
        /// Number of slots the policy scanned.
        slots: usize,
    },

    /// A page id lies outside the range a bounded table can index.
    #[error("page {page} is outside the table's {pages} pages")]
    PageOutOfRange {
        /// The offending page id.
        page: PageId,
        /// Number of pages the table covers.
        pages: u64,
    },

    /// The simulation parameters do not describe a usable machine.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
