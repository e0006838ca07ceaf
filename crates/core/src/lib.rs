//! Page-table and page-replacement simulator library.
//!
//! This crate replays a trace of memory accesses against several page-table
//! organizations and counts accesses and page faults for each:
//! 1. **Tables:** Direct (single-level), two-level hierarchical, and inverted.
//! 2. **Replacement:** FIFO, LRU, Second-Chance (clock) and seeded Random policies.
//! 3. **Driver:** Virtual clock, address decoding and per-scheme statistics.
//! 4. **Input/Output:** Trace reader, JSON-deserializable configuration and reports.

/// Common types (addresses, page geometry, access modes, errors).
pub mod common;
/// Simulator configuration (defaults, policy and scheme selectors, geometry).
pub mod config;
/// Page replacement policies and the frame metadata they operate on.
pub mod policy;
/// Trace-driven simulation driver.
pub mod sim;
/// Run statistics and report rendering.
pub mod stats;
/// Page-table organizations.
pub mod table;
/// Memory access trace reader.
pub mod trace;

/// Root configuration type; use `SimConfig::default()` or deserialize from JSON.
pub use crate::config::SimConfig;
/// Top-level driver; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Fatal error type of the simulation core.
pub use crate::common::SimError;
