// SPDX-License-Identifier: MIT
//
// Terminal query protocol: write a request, read a delimited reply.
//
// Some facts about the terminal are only available by asking it: we write
// a control sequence to stdout and the terminal answers on stdin. This
// module treats that as a tiny request/response exchange:
//
//   request  ──►  terminal
//   reply    ◄──  ESC '[' ... terminator
//
// The reply is read one byte at a time into a bounded scratch area. Reading
// stops at the terminator, when the scratch area is full, or when the read
// times out (raw mode's VTIME), whichever comes first. Nothing here blocks
// forever and nothing here panics on a garbled reply.
//
// The only query in use is the cursor position report (DSR 6), whose reply
// grammar is:
//
//   report := ESC '[' row ';' col 'R'
//   row    := digit+
//   col    := digit+
//
// Rows and columns are 1-based, so zero is rejected along with everything
// else that does not match the grammar.

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::ansi;

/// Control Sequence Introducer: `ESC [`.
pub const CSI: &[u8] = b"\x1b[";

/// Largest reply we are willing to read for a cursor position report.
///
/// `ESC [ 65535 ; 65535 R` is 14 bytes; anything near this cap is noise.
pub const MAX_REPORT_LEN: usize = 31;

/// Why a query failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The reply did not begin with `ESC [`.
    #[error("reply does not start with ESC [")]
    MissingIntroducer,

    /// The reply had no `;` between the two fields.
    #[error("reply has no ';' separator")]
    MissingSeparator,

    /// A field was empty, non-decimal, or too large.
    #[error("reply field is not a decimal number")]
    InvalidNumber,

    /// No terminator arrived within the scratch limit (or before timeout).
    #[error("no terminator within {0} bytes")]
    Unterminated(usize),

    /// The terminal reported a zero row or column.
    #[error("terminal reported a zero dimension")]
    ZeroSize,

    /// Writing the request or reading the reply failed.
    #[error("terminal query i/o: {0}")]
    Io(#[from] io::Error),
}

/// A parsed cursor position report, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorReport {
    pub row: u16,
    pub col: u16,
}

// ─── Exchange ────────────────────────────────────────────────────────────────

/// Send `request` and collect the reply up to and including `terminator`.
///
/// At most `limit` bytes are read. The returned bytes end with
/// `terminator` only if it was seen; otherwise the caller gets whatever
/// arrived before the limit or the read timeout.
///
/// # Errors
///
/// Returns [`ProbeError::Io`] if the request cannot be written or a read
/// fails for a reason other than a timeout.
pub fn exchange(
    input: &mut impl Read,
    output: &mut impl Write,
    request: &[u8],
    terminator: u8,
    limit: usize,
) -> Result<Vec<u8>, ProbeError> {
    output.write_all(request)?;
    output.flush()?;

    let mut reply = Vec::with_capacity(limit);
    let mut byte = [0u8; 1];

    while reply.len() < limit {
        match input.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                reply.push(byte[0]);
                if byte[0] == terminator {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                break;
            }
            Err(e) => return Err(ProbeError::Io(e)),
        }
    }

    Ok(reply)
}

// ─── Cursor Position Report ─────────────────────────────────────────────────

/// Ask the terminal where the cursor is.
///
/// `limit` bounds the reply scratch area; it is clamped to
/// [`MAX_REPORT_LEN`].
///
/// # Errors
///
/// Returns a [`ProbeError`] if the exchange fails or the reply does not
/// match the report grammar.
pub fn query_cursor_position(
    input: &mut impl Read,
    output: &mut impl Write,
    limit: usize,
) -> Result<CursorReport, ProbeError> {
    let mut request = Vec::with_capacity(4);
    ansi::request_cursor_position(&mut request)?;

    let reply = exchange(input, output, &request, b'R', limit.min(MAX_REPORT_LEN))?;
    parse_cursor_report(&reply)
}

/// Parse `ESC [ row ; col R`.
///
/// # Errors
///
/// Returns the first grammar violation found, checked in order:
/// introducer, terminator, separator, numbers, non-zero.
pub fn parse_cursor_report(reply: &[u8]) -> Result<CursorReport, ProbeError> {
    let body = reply
        .strip_prefix(CSI)
        .ok_or(ProbeError::MissingIntroducer)?;
    let body = body
        .strip_suffix(b"R")
        .ok_or(ProbeError::Unterminated(reply.len()))?;

    let split = body
        .iter()
        .position(|&b| b == b';')
        .ok_or(ProbeError::MissingSeparator)?;
    let row = parse_decimal(&body[..split])?;
    let col = parse_decimal(&body[split + 1..])?;

    if row == 0 || col == 0 {
        return Err(ProbeError::ZeroSize);
    }

    Ok(CursorReport { row, col })
}

/// Strict decimal: one or more ASCII digits, fits in `u16`.
fn parse_decimal(field: &[u8]) -> Result<u16, ProbeError> {
    if field.is_empty() {
        return Err(ProbeError::InvalidNumber);
    }

    field.iter().try_fold(0u16, |acc, &b| {
        if !b.is_ascii_digit() {
            return Err(ProbeError::InvalidNumber);
        }
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u16::from(b - b'0')))
            .ok_or(ProbeError::InvalidNumber)
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
