//! Virtual addresses and page geometry.
//!
//! This module defines the strong types used to talk about the simulated
//! address space. It provides the following:
//! 1. **Identifiers:** `PageId`, `FrameId`, and the virtual clock `Tick`.
//! 2. **Type Safety:** `VirtAddr` keeps raw trace addresses apart from page numbers.
//! 3. **Address Decoding:** `PageSize` validates a power-of-two page size and
//!    turns an address into its page number with a single right shift.

use serde::Serialize;

use super::error::SimError;

/// Virtual page number.
pub type PageId = u64;

/// Physical frame index.
pub type FrameId = usize;

/// Virtual clock value. The driver advances it once per trace record.
pub type Tick = u64;

/// A virtual address as it appears in a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VirtAddr(pub u64);

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }
}

/// A validated page size.
///
/// Holds the size in bytes together with its base-2 logarithm, which is the
/// shift used by the address decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageSize {
    bytes: u64,
    shift: u32,
}

impl PageSize {
    /// Creates a page size from a byte count.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if `bytes` is not a power of two.
    pub fn new(bytes: u64) -> Result<Self, SimError> {
        if !bytes.is_power_of_two() {
            return Err(SimError::InvalidConfig(format!(
                "page size {bytes} is not a power of two"
            )));
        }
        Ok(Self {
            bytes,
            shift: bytes.trailing_zeros(),
        })
    }

    /// Page size in bytes.
    #[inline(always)]
    pub const fn bytes(self) -> u64 {
        self.bytes
    }

    /// Number of offset bits in an address (log2 of the page size).
    #[inline(always)]
    pub const fn shift(self) -> u32 {
        self.shift
    }

    /// Decodes the page number of `addr`.
    #[inline(always)]
    pub const fn page_of(self, addr: VirtAddr) -> PageId {
        addr.val() >> self.shift
    }
}
