//! Simulation statistics collection and reporting.
//!
//! This module tracks the outcome of a run. It provides:
//! 1. **Per-table counters:** Accesses, faults and table capacity for each scheme.
//! 2. **Run summary:** Policy, machine geometry, trace length and access mix.
//! 3. **Rendering:** A plain-text report on stdout and a JSON form via `serde`.

use serde::Serialize;

use crate::common::SimError;
use crate::config::{PolicyKind, Scheme};

/// Counters of one page table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Accesses consumed, including faulting ones.
    pub accesses: u64,
    /// Accesses that found their page non-resident.
    pub faults: u64,
    /// Entries the table has allocated.
    pub capacity: u64,
}

impl TableStats {
    /// Accesses that found their page resident.
    pub const fn hits(&self) -> u64 {
        self.accesses - self.faults
    }

    /// Fraction of accesses that faulted, in `[0, 1]`.
    pub fn fault_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.faults as f64 / self.accesses as f64
        }
    }
}

/// Counters of one scheme, labelled for the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SchemeStats {
    /// Which table these counters belong to.
    pub scheme: Scheme,
    /// The table's counters.
    #[serde(flatten)]
    pub stats: TableStats,
}

/// Summary of a whole run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimReport {
    /// Replacement policy every table used.
    pub policy: PolicyKind,
    /// Page size in bytes.
    pub page_size: u64,
    /// Number of physical frames.
    pub num_frames: usize,
    /// Number of virtual pages.
    pub num_pages: u64,
    /// Final virtual clock value (trace records consumed).
    pub clock: u64,
    /// Read records consumed.
    pub reads: u64,
    /// Write records consumed.
    pub writes: u64,
    /// Wall-clock time spent in the run, in seconds.
    pub host_seconds: f64,
    /// Per-scheme counters in configuration order.
    pub tables: Vec<SchemeStats>,
}

/// Section names for selective report output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const REPORT_SECTIONS: &[&str] = &["summary", "tables"];

impl SimReport {
    /// Counters of `scheme`, if it was driven.
    pub fn table(&self, scheme: Scheme) -> Option<&TableStats> {
        self.tables
            .iter()
            .find(|entry| entry.scheme == scheme)
            .map(|entry| &entry.stats)
    }

    /// Checks that every name in `sections` is one of [`REPORT_SECTIONS`].
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first unknown section.
    pub fn check_sections(sections: &[String]) -> Result<(), SimError> {
        match sections
            .iter()
            .find(|s| !REPORT_SECTIONS.contains(&s.as_str()))
        {
            Some(unknown) => Err(SimError::InvalidConfig(format!(
                "unknown report section `{unknown}` (expected one of: {})",
                REPORT_SECTIONS.join(", ")
            ))),
            None => Ok(()),
        }
    }

    /// Renders the requested sections as text.
    ///
    /// Each element of `sections` should be `"summary"` or `"tables"`; an
    /// empty slice selects everything.
    pub fn render_sections(&self, sections: &[String]) -> String {
        use std::fmt::Write as _;

        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();

        let _ = writeln!(out, "==========================================================");
        let _ = writeln!(out, "PAGE TABLE SIMULATION STATISTICS");
        let _ = writeln!(out, "==========================================================");
        if want("summary") {
            let clock = self.clock.max(1) as f64;
            let _ = writeln!(out, "policy                   {}", self.policy);
            let _ = writeln!(out, "page_size                {} B", self.page_size);
            let _ = writeln!(out, "frames                   {}", self.num_frames);
            let _ = writeln!(out, "virtual_pages            {}", self.num_pages);
            let _ = writeln!(out, "trace_records            {}", self.clock);
            let _ = writeln!(
                out,
                "  reads                  {} ({:.2}%)",
                self.reads,
                self.reads as f64 / clock * 100.0
            );
            let _ = writeln!(
                out,
                "  writes                 {} ({:.2}%)",
                self.writes,
                self.writes as f64 / clock * 100.0
            );
            let _ = writeln!(out, "host_seconds             {:.4} s", self.host_seconds);
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("tables") {
            let _ = writeln!(out, "PAGE TABLES");
            for entry in &self.tables {
                let _ = writeln!(
                    out,
                    "  {:<13} accesses: {:<10} | faults: {:<10} | fault_rate: {:>6.2}% | size: {}",
                    entry.scheme.name(),
                    entry.stats.accesses,
                    entry.stats.faults,
                    entry.stats.fault_rate() * 100.0,
                    entry.stats.capacity
                );
            }
        }
        let _ = writeln!(out, "==========================================================");
        out
    }

    /// Prints only the requested sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints the full report to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
