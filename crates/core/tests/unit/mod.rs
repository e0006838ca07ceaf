//! # Unit Components
//!
//! This module organizes the unit tests by component: replacement policies,
//! the three table schemes, configuration, and the simulation driver.

/// Unit tests for configuration parsing and machine geometry.
pub mod config;




/// Unit tests for victim selection.
///
/// This module checks each policy against hand-built frame sets, including
/// tie-breaking, the persistent clock hand and seeded reproducibility.
pub mod policy;
