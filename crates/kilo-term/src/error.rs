// SPDX-License-Identifier: MIT
//
// Terminal-layer errors.
//
// Every variant is fatal to the editor: a terminal whose mode we cannot
// guarantee, an input stream we cannot read, or a screen whose size we
// cannot learn. The `Display` text leads with the failed operation so the
// binary can print it verbatim as its exit diagnostic.

use std::io;

use thiserror::Error;

use crate::probe::ProbeError;

/// Fatal terminal errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The current terminal attributes could not be read.
    #[error("tcgetattr: {0}")]
    TerminalQuery(#[source] io::Error),

    /// Raw-mode (or original) attributes could not be applied.
    #[error("tcsetattr: {0}")]
    TerminalConfig(#[source] io::Error),

    /// A read or write failed for a reason other than a timeout.
    #[error("{op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// Neither the OS query nor the cursor-position probe produced a size.
    #[error("getWindowSize: {0}")]
    GeometryProbe(#[source] ProbeError),
}

/// Result alias for terminal-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) const fn read(source: io::Error) -> Self {
        Self::Io { op: "read", source }
    }

    pub(crate) const fn write(source: io::Error) -> Self {
        Self::Io { op: "write", source }
    }

    /// Name of the operation that failed.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::TerminalQuery(_) => "tcgetattr",
            Self::TerminalConfig(_) => "tcsetattr",
            Self::Io { op, .. } => *op,
            Self::GeometryProbe(_) => "getWindowSize",
        }
    }
}
