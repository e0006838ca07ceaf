//! Simulator: owns the clock and one page table per configured scheme.
//!
//! Every table sees the same page sequence but keeps its own frames, counters
//! and replacement state, so the schemes can be compared on a single pass
//! over the trace.

use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::common::{AccessMode, PageId, SimError, Tick};
use crate::config::{Geometry, PolicyKind, Scheme, SimConfig};
use crate::policy;
use crate::stats::{SchemeStats, SimReport};
use crate::table::{DirectPageTable, HierarchicalPageTable, InvertedPageTable, PageTable};
use crate::trace::{TraceError, TraceRecord};

/// Error that ends a trace run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The trace could not be read.
    #[error(transparent)]
    Trace(#[from] TraceError),
    /// A table reported a fatal error.
    #[error(transparent)]
    Sim(#[from] SimError),
}

/// Creates the table of `scheme` for `geometry`.
///
/// # Errors
///
/// Returns [`SimError::InvalidConfig`] if the table would be too large to allocate.
pub fn build_table(
    scheme: Scheme,
    geometry: &Geometry,
    kind: PolicyKind,
    seed: u64,
) -> Result<Box<dyn PageTable>, SimError> {
    geometry.check(scheme)?;
    let table: Box<dyn PageTable> = match scheme {
        Scheme::Direct => Box::new(DirectPageTable::new(
            geometry.num_pages as usize,
            geometry.num_frames,
            policy::build(kind, seed),
        )),
        Scheme::Hierarchical => Box::new(HierarchicalPageTable::new(
            geometry.l1_size() as usize,
            geometry.l2_size() as usize,
            geometry.num_frames,
            kind,
            seed,
        )),
        Scheme::Inverted => Box::new(InvertedPageTable::new(
            geometry.num_frames,
            policy::build(kind, seed),
        )),
    };
    Ok(table)
}

/// Top-level simulator: virtual clock, access mix and the tables under test.
#[derive(Debug)]
pub struct Simulator {
    policy: PolicyKind,
    geometry: Geometry,
    tables: Vec<Box<dyn PageTable>>,
    clock: Tick,
    reads: u64,
    writes: u64,
    started: Instant,
}

impl Simulator {
    /// Validates `config` and builds one table per configured scheme.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for an unusable geometry, an empty
    /// or repeated scheme list, or a table too large to allocate.
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        let geometry = config.geometry()?;

        if config.schemes.is_empty() {
            return Err(SimError::InvalidConfig("no page-table scheme selected".into()));
        }
        let mut tables: Vec<Box<dyn PageTable>> = Vec::with_capacity(config.schemes.len());
        for &scheme in &config.schemes {
            if tables.iter().any(|table| table.scheme() == scheme) {
                return Err(SimError::InvalidConfig(format!("scheme `{scheme}` listed twice")));
            }
            tables.push(build_table(scheme, &geometry, config.policy, config.seed)?);
        }

        info!(
            policy = %config.policy,
            page_size = geometry.page_size.bytes(),
            frames = geometry.num_frames,
            pages = geometry.num_pages,
            l1 = geometry.l1_size(),
            l2 = geometry.l2_size(),
            "simulator ready"
        );

        Ok(Self {
            policy: config.policy,
            geometry,
            tables,
            clock: 0,
            reads: 0,
            writes: 0,
            started: Instant::now(),
        })
    }

    /// Current virtual clock (records consumed so far).
    pub const fn clock(&self) -> Tick {
        self.clock
    }

    /// Machine geometry the tables were built for.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Tables in configuration order.
    pub fn tables(&self) -> &[Box<dyn PageTable>] {
        &self.tables
    }

    /// The table of `scheme`, if it is being driven.
    pub fn table(&self, scheme: Scheme) -> Option<&dyn PageTable> {
        self.tables
            .iter()
            .find(|table| table.scheme() == scheme)
            .map(|table| &**table)
    }

    /// Advances the clock and presents `page` to every table.
    ///
    /// # Errors
    ///
    /// Stops at the first table that reports an error; later tables do not
    /// see the access.
    pub fn access_page(&mut self, page: PageId) -> Result<(), SimError> {
        self.clock += 1;
        let clock = self.clock;
        for table in &mut self.tables {
            if let Err(e) = table.access(page, clock) {
                warn!(scheme = %table.scheme(), page, clock, error = %e, "fatal table error");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Decodes one trace record and feeds it to every table.
    ///
    /// # Errors
    ///
    /// See [`Simulator::access_page`].
    pub fn step(&mut self, record: &TraceRecord) -> Result<(), SimError> {
        match record.mode {
            AccessMode::Read => self.reads += 1,
            AccessMode::Write => self.writes += 1,
        }
        let page = self.geometry.page_size.page_of(record.addr);
        self.access_page(page)
    }

    /// Feeds already-parsed records until the iterator ends or a table fails.
    ///
    /// # Errors
    ///
    /// Returns the first table error.
    pub fn run<I>(&mut self, records: I) -> Result<(), SimError>
    where
        I: IntoIterator<Item = TraceRecord>,
    {
        for record in records {
            self.step(&record)?;
        }
        info!(records = self.clock, "trace complete");
        Ok(())
    }

    /// Feeds records from a trace reader until it ends or anything fails.
    ///
    /// # Errors
    ///
    /// Returns the first read or table error.
    pub fn run_trace<I>(&mut self, records: I) -> Result<(), RunError>
    where
        I: IntoIterator<Item = Result<TraceRecord, TraceError>>,
    {
        for record in records {
            self.step(&record?)?;
        }
        info!(records = self.clock, "trace complete");
        Ok(())
    }

    /// Snapshot of every counter.
    pub fn report(&self) -> SimReport {
        SimReport {
            policy: self.policy,
            page_size: self.geometry.page_size.bytes(),
            num_frames: self.geometry.num_frames,
            num_pages: self.geometry.num_pages,
            clock: self.clock,
            reads: self.reads,
            writes: self.writes,
            host_seconds: self.started.elapsed().as_secs_f64(),
            tables: self
                .tables
                .iter()
                .map(|table| SchemeStats {
                    scheme: table.scheme(),
                    stats: table.stats(),
                })
                .collect(),
        }
    }
}
