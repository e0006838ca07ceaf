//! Memory Access Modes.
//!
//! Every trace record carries the mode of the access that produced it. The
//! simulation core tracks residency only, so the mode never influences a
//! translation; it is carried through for reporting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mode of a traced memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    /// Data read (`R` in a trace file).
    Read,
    /// Data write (`W` in a trace file).
    Write,
}

impl AccessMode {
    /// Maps a trace mode character to an access mode.
    ///
    /// Accepts `R`/`r` and `W`/`w`; anything else yields `None`.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'R' | 'r' => Some(Self::Read),
            'W' | 'w' => Some(Self::Write),
            _ => None,
        }
    }

    /// Returns the canonical trace character for this mode.
    pub const fn as_char(self) -> char {
        match self {
            Self::Read => 'R',
            Self::Write => 'W',
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
