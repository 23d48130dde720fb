// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Window geometry: how big is the screen?
//
// Two tiers. First ask the kernel (`ioctl(TIOCGWINSZ)`). Some terminals
// and serial lines answer that with zeros or not at all, so the fallback
// asks the terminal itself: push the cursor into the bottom-right corner
// (the terminal clamps the move at its real edges) and request a cursor
// position report. The reported position *is* the size.
//
// A zero column count is never accepted from either tier.

use std::io::{Read, Write};

use tracing::{debug, info, warn};

use crate::ansi;
use crate::error::{Error, Result};
use crate::probe::{self, ProbeError};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Whether both dimensions are non-zero.
    #[inline]
    #[must_use]
    pub const fn is_usable(self) -> bool {
        self.cols > 0 && self.rows > 0
    }
}

// ─── Tier 1: kernel ─────────────────────────────────────────────────────────

/// Query the terminal size via `ioctl(TIOCGWINSZ)` on stdout.
///
/// Returns `None` if the call fails. The result is passed through as the
/// kernel reports it, zeros included; [`probe_size`] decides whether it is
/// usable.
#[must_use]
pub fn os_window_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    (result == 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

// ─── Resolution ─────────────────────────────────────────────────────────────

/// Resolve the screen size, falling back to the cursor probe when the
/// direct query is unavailable or reports a zero dimension.
///
/// `direct` is normally [`os_window_size`]. `input`/`output` are the
/// terminal's reply and request streams; `scratch_len` bounds the reply.
///
/// # Errors
///
/// Returns [`Error::GeometryProbe`] if both tiers fail.
pub fn probe_size(
    direct: impl FnOnce() -> Option<Size>,
    input: &mut impl Read,
    output: &mut impl Write,
    scratch_len: usize,
) -> Result<Size> {
    match direct() {
        Some(size) if size.is_usable() => {
            info!(cols = size.cols, rows = size.rows, source = "ioctl", "screen size");
            return Ok(size);
        }
        Some(size) => debug!(cols = size.cols, rows = size.rows, "ioctl size unusable"),
        None => debug!("ioctl size unavailable"),
    }

    match probe_by_cursor(input, output, scratch_len) {
        Ok(size) => {
            info!(cols = size.cols, rows = size.rows, source = "cursor probe", "screen size");
            Ok(size)
        }
        Err(e) => {
            warn!(error = %e, "cursor position probe failed");
            Err(Error::GeometryProbe(e))
        }
    }
}

/// Bottom-right corner, then ask where we ended up.
fn probe_by_cursor(
    input: &mut impl Read,
    output: &mut impl Write,
    scratch_len: usize,
) -> std::result::Result<Size, ProbeError> {
    ansi::cursor_to_far_corner(output)?;
    let report = probe::query_cursor_position(input, output, scratch_len)?;

    Ok(Size {
        cols: report.col,
        rows: report.row,
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MAX_REPORT_LEN;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const FALLBACK_WRITES: &[u8] = b"\x1b[999C\x1b[999B\x1b[6n";

    fn resolve(direct: Option<Size>, reply: &[u8]) -> (Result<Size>, Vec<u8>) {
        let mut input = Cursor::new(reply.to_vec());
        let mut output = Vec::new();
        let result = probe_size(|| direct, &mut input, &mut output, MAX_REPORT_LEN);
        (result, output)
    }

    // ── Size ──────────────────────────────────────────────────────────

    #[test]
    fn usable_sizes() {
        assert!(Size { cols: 80, rows: 24 }.is_usable());
        assert!(!Size { cols: 0, rows: 24 }.is_usable());
        assert!(!Size { cols: 80, rows: 0 }.is_usable());
    }

    // ── Tier selection ────────────────────────────────────────────────

    #[test]
    fn direct_answer_wins() {
        let (size, output) = resolve(Some(Size { cols: 120, rows: 40 }), b"\x1b[24;80R");
        assert_eq!(size.unwrap(), Size { cols: 120, rows: 40 });
        assert!(output.is_empty(), "probe must not run");
    }

    #[test]
    fn zero_columns_fall_back_to_probe() {
        let (size, output) = resolve(Some(Size { cols: 0, rows: 24 }), b"\x1b[24;80R");
        assert_eq!(size.unwrap(), Size { cols: 80, rows: 24 });
        assert_eq!(output, FALLBACK_WRITES);
    }

    #[test]
    fn zero_rows_fall_back_to_probe() {
        let (size, _) = resolve(Some(Size { cols: 80, rows: 0 }), b"\x1b[30;100R");
        assert_eq!(size.unwrap(), Size { cols: 100, rows: 30 });
    }

    #[test]
    fn unavailable_query_falls_back_to_probe() {
        let (size, output) = resolve(None, b"\x1b[24;80R");
        assert_eq!(size.unwrap(), Size { cols: 80, rows: 24 });
        assert_eq!(output, FALLBACK_WRITES);
    }

    // ── Failure ───────────────────────────────────────────────────────

    #[test]
    fn garbled_reply_is_a_probe_failure() {
        let (size, _) = resolve(None, b"24;80R");
        assert!(matches!(
            size,
            Err(Error::GeometryProbe(ProbeError::MissingIntroducer))
        ));
    }

    #[test]
    fn silent_terminal_is_a_probe_failure() {
        let (size, _) = resolve(None, b"");
        assert!(matches!(
            size,
            Err(Error::GeometryProbe(ProbeError::MissingIntroducer))
        ));
    }

    #[test]
    fn zero_column_reply_is_a_probe_failure() {
        let (size, _) = resolve(Some(Size { cols: 0, rows: 0 }), b"\x1b[24;0R");
        assert!(matches!(size, Err(Error::GeometryProbe(ProbeError::ZeroSize))));
    }

    #[test]
    fn os_window_size_does_not_panic() {
        let _ = os_window_size();
    }
}
