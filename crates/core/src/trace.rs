//! Memory access trace reader.
//!
//! A trace is a text file with one access per line: a hexadecimal virtual
//! address (an optional `0x` prefix is accepted) followed by the access mode
//! character, `R` or `W`:
//!
//! ```text
//! 0041f7a0 R
//! 13f5e2c0 W
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Anything after the
//! mode character is ignored. A malformed line stops the reader; it is never
//! skipped silently.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::common::{AccessMode, VirtAddr};

/// Errors raised while reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line is not `<hex address> <R|W>`.
    #[error("line {line}: malformed trace record `{text}`")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// The underlying reader failed.
    #[error("trace I/O error: {0}")]
    Io(#[from] io::Error),
}

/// One traced memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Accessed virtual address.
    pub addr: VirtAddr,
    /// Read or write.
    pub mode: AccessMode,
}

impl TraceRecord {
    /// Creates a record.
    pub const fn new(addr: u64, mode: AccessMode) -> Self {
        Self {
            addr: VirtAddr::new(addr),
            mode,
        }
    }
}

/// Parses one trace line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] if the address is not hexadecimal or the
/// mode is missing or unknown.
pub fn parse_record(line: usize, text: &str) -> Result<Option<TraceRecord>, TraceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let malformed = || TraceError::Malformed {
        line,
        text: trimmed.to_string(),
    };

    let mut fields = trimmed.split_whitespace();
    let addr = fields.next().ok_or_else(malformed)?;
    let mode = fields.next().ok_or_else(malformed)?;

    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    let addr = u64::from_str_radix(digits, 16).map_err(|_| malformed())?;

    let mut chars = mode.chars();
    let mode = match (chars.next(), chars.next()) {
        (Some(c), None) => AccessMode::from_char(c).ok_or_else(malformed)?,
        _ => return Err(malformed()),
    };

    Ok(Some(TraceRecord::new(addr, mode)))
}

/// Iterator over the records of a trace.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Number of lines read so far.
    pub const fn lines_read(&self) -> usize {
        self.line
    }
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match parse_record(self.line, &text) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
