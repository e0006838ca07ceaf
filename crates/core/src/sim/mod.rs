//! Trace-driven simulation.
//!
//! Provides the driver that feeds a trace through one table per configured
//! scheme, advancing the virtual clock once per record.

/// The simulation driver.
pub mod simulator;

pub use simulator::{RunError, Simulator, build_table};
