//! Configuration system for the page-table simulator.
//!
//! This module defines the configuration structures and enums used to
//! parameterize a run. It provides:
//! 1. **Defaults:** Baseline machine constants (page size, memory size, address width).
//! 2. **Structures:** `SimConfig`, deserializable from JSON or assembled by the CLI.
//! 3. **Enums:** Replacement policy and page-table scheme selectors.
//! 4. **Geometry:** Validation and derivation of page, frame and fan-out counts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{PageSize, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Default page size in bytes (4 KiB).
    pub const PAGE_SIZE: u64 = 4096;

    /// Default physical memory size in bytes (16 KiB, i.e. four 4 KiB frames).
    pub const MEMORY_SIZE: u64 = 16 * 1024;

    /// Default width of a virtual address in bits.
    ///
    /// Trace addresses are 32-bit hexadecimal values.
    pub const ADDRESS_BITS: u32 = 32;

    /// Default seed of the Random policy's generator.
    pub const SEED: u64 = 1;

    /// Upper bound on eagerly allocated table entries.
    ///
    /// Applies to the direct table's page array and the hierarchical table's
    /// first level; both are allocated in full at construction.
    pub const MAX_TABLE_ENTRIES: u64 = 1 << 28;
}

/// Page replacement policy algorithms.
///
/// Specifies the algorithm used to select which resident page to evict when a
/// new page must be loaded into a full frame pool.
///
/// Parsing is case-insensitive and accepts the short names used by trace
/// tooling (`2a` for second chance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum PolicyKind {
    /// First In First Out: evicts the page loaded earliest.
    #[default]
    Fifo,
    /// Least Recently Used: evicts the page touched least recently.
    Lru,
    /// Second chance (clock): FIFO order with a referenced bit and a persistent hand.
    SecondChance,
    /// Uniform random choice from a seeded generator.
    Random,
}

impl PolicyKind {
    /// All policies, in display order.
    pub const ALL: [Self; 4] = [Self::Fifo, Self::Lru, Self::SecondChance, Self::Random];

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::Lru => "lru",
            Self::SecondChance => "second-chance",
            Self::Random => "random",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(Self::Fifo),
            "lru" => Ok(Self::Lru),
            "2a" | "second-chance" | "second_chance" | "secondchance" | "clock" => {
                Ok(Self::SecondChance)
            }
            "random" | "rand" => Ok(Self::Random),
            _ => Err(SimError::UnknownPolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for PolicyKind {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Page-table organizations the simulator can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Single-level table indexed by page number.
    Direct,
    /// Two-level table with lazily allocated second levels.
    Hierarchical,
    /// Frame-indexed table searched by owning page.
    Inverted,
}

impl Scheme {
    /// All schemes, in the order reports list them.
    pub const ALL: [Self; 3] = [Self::Direct, Self::Hierarchical, Self::Inverted];

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Hierarchical => "hierarchical",
            Self::Inverted => "inverted",
        }
    }
}

impl FromStr for Scheme {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "dense" => Ok(Self::Direct),
            "hierarchical" | "two-level" => Ok(Self::Hierarchical),
            "inverted" => Ok(Self::Inverted),
            _ => Err(SimError::InvalidConfig(format!("unknown page-table scheme `{s}`"))),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Root configuration of a simulation run.
///
/// # Examples
///
/// ```
/// use pagesim_core::config::{PolicyKind, SimConfig};
///
/// let config = SimConfig::default();
/// assert_eq!(config.policy, PolicyKind::Fifo);
/// assert_eq!(config.geometry().unwrap().num_frames, 4);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use pagesim_core::config::{PolicyKind, Scheme, SimConfig};
///
/// let json = r#"{
///     "policy": "2a",
///     "page_size": 8192,
///     "memory_size": 65536,
///     "schemes": ["inverted"]
/// }"#;
///
/// let config: SimConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.policy, PolicyKind::SecondChance);
/// assert_eq!(config.address_bits, 32);
/// assert_eq!(config.schemes, vec![Scheme::Inverted]);
/// assert_eq!(config.geometry().unwrap().num_frames, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Replacement policy used by every table.
    #[serde(default)]
    pub policy: PolicyKind,

    /// Page (and frame) size in bytes; must be a power of two.
    #[serde(default = "SimConfig::default_page_size")]
    pub page_size: u64,

    /// Physical memory size in bytes.
    #[serde(default = "SimConfig::default_memory_size")]
    pub memory_size: u64,

    /// Width of a virtual address in bits.
    #[serde(default = "SimConfig::default_address_bits")]
    pub address_bits: u32,

    /// Seed for the Random policy.
    #[serde(default = "SimConfig::default_seed")]
    pub seed: u64,

    /// Tables to drive, in report order.
    #[serde(default = "SimConfig::default_schemes")]
    pub schemes: Vec<Scheme>,
}

impl SimConfig {
    /// Returns the default page size in bytes.
    const fn default_page_size() -> u64 {
        defaults::PAGE_SIZE
    }

    /// Returns the default physical memory size in bytes.
    const fn default_memory_size() -> u64 {
        defaults::MEMORY_SIZE
    }

    /// Returns the default virtual address width.
    const fn default_address_bits() -> u32 {
        defaults::ADDRESS_BITS
    }

    /// Returns the default Random policy seed.
    const fn default_seed() -> u64 {
        defaults::SEED
    }

    /// Drives every scheme by default.
    fn default_schemes() -> Vec<Scheme> {
        Scheme::ALL.to_vec()
    }

    /// Validates the configuration and derives the table geometry.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the page size is not a power of
    /// two or does not fit the address width, or if physical memory holds no
    /// frame or more frames than there are virtual pages.
    pub fn geometry(&self) -> Result<Geometry, SimError> {
        let page_size = PageSize::new(self.page_size)?;

        if self.address_bits == 0 || self.address_bits > 64 {
            return Err(SimError::InvalidConfig(format!(
                "address width of {} bits is outside 1..=64",
                self.address_bits
            )));
        }
        let vpn_bits = self
            .address_bits
            .checked_sub(page_size.shift())
            .ok_or_else(|| {
                SimError::InvalidConfig(format!(
                    "page size {} exceeds a {}-bit address space",
                    self.page_size, self.address_bits
                ))
            })?;
        let num_pages = 1u64.checked_shl(vpn_bits).ok_or_else(|| {
            SimError::InvalidConfig(format!("{vpn_bits}-bit page numbers are not supported"))
        })?;

        let num_frames = usize::try_from(self.memory_size / self.page_size).unwrap_or(usize::MAX);
        if num_frames == 0 {
            return Err(SimError::InvalidConfig(format!(
                "memory size {} is smaller than one {}-byte page",
                self.memory_size, self.page_size
            )));
        }

        if num_frames as u64 > num_pages {
            return Err(SimError::InvalidConfig(format!(
                "{num_frames} frames exceed the {num_pages} pages of a {}-bit address space",
                self.address_bits
            )));
        }

        let l2_bits = vpn_bits / 2;
        let l1_bits = vpn_bits - l2_bits;

        Ok(Geometry {
            page_size,
            num_pages,
            num_frames,
            l1_bits,
            l2_bits,
        })
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            page_size: defaults::PAGE_SIZE,
            memory_size: defaults::MEMORY_SIZE,
            address_bits: defaults::ADDRESS_BITS,
            seed: defaults::SEED,
            schemes: Self::default_schemes(),
        }
    }
}

/// Derived sizes of the simulated machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    /// Validated page size.
    pub page_size: PageSize,
    /// Number of virtual pages in the address space.
    pub num_pages: u64,
    /// Number of physical frames.
    pub num_frames: usize,
    /// Page-number bits consumed by the hierarchical first level.
    pub l1_bits: u32,
    /// Page-number bits consumed by the hierarchical second level.
    pub l2_bits: u32,
}

impl Geometry {
    /// First-level fan-out of the hierarchical table.
    pub const fn l1_size(&self) -> u64 {
        1 << self.l1_bits
    }

    /// Second-level fan-out of the hierarchical table.
    pub const fn l2_size(&self) -> u64 {
        1 << self.l2_bits
    }

    /// Checks that the tables of `scheme` can be allocated for this geometry.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] when the table or frame pool
    /// `scheme` allocates up front would exceed the entry limit.
    pub fn check(&self, scheme: Scheme) -> Result<(), SimError> {
        let table = match scheme {
            Scheme::Direct => self.num_pages,
            Scheme::Hierarchical => self.l1_size().max(self.l2_size()),
            Scheme::Inverted => 0,
        };
        // Every scheme also holds one slot per frame.
        let eager = table.max(self.num_frames as u64);
        if eager > defaults::MAX_TABLE_ENTRIES {
            return Err(SimError::InvalidConfig(format!(
                "{scheme} table needs {eager} entries (limit {})",
                defaults::MAX_TABLE_ENTRIES
            )));
        }
        Ok(())
    }
}
