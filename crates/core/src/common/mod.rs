//! Common types used throughout the page-table simulator.
//!
//! This module provides the small building blocks shared by every layer:
//! 1. **Address Types:** Virtual addresses, page geometry, and the page/frame/tick aliases.
//! 2. **Access Modes:** Read/write classification of trace records.
//! 3. **Error Handling:** The fatal error taxonomy of the simulation core.

/// Address types and the address decoder.
pub mod addr;

/// Memory access mode definitions.
pub mod data;

/// Error types for the simulation core.
pub mod error;

pub use addr::{FrameId, PageId, PageSize, Tick, VirtAddr};
pub use data::AccessMode;
pub use error::SimError;
