//! Screen rendering: one full frame per call.
//!
//! A frame, in order:
//!
//! 1. hide the cursor (so it doesn't flicker across the screen as we draw)
//! 2. home the cursor
//! 3. one line per screen row: a `~` marker, or the centered banner on the
//!    row a third of the way down, then clear-to-end-of-line; rows are
//!    joined with `\r\n` and the last row gets none (a trailing newline
//!    would scroll the screen)
//! 4. move the cursor to the session's position
//! 5. show the cursor
//!
//! Everything goes into the caller's [`AppendBuffer`]; the event loop writes
//! it out in one go. Drawing is a pure function of the session and banner,
//! so an unchanged session redraws byte-for-byte the same.

use std::io::{self, Write};

use kilo_term::ansi;
use kilo_term::buffer::AppendBuffer;
use kilo_term::geometry::Size;

use crate::session::Session;

/// Marker drawn at the start of rows with no content.
pub const MARKER: u8 = b'~';

/// The default welcome banner.
#[must_use]
pub fn default_banner() -> String {
    format!("Kilo editor -- version {}", env!("CARGO_PKG_VERSION"))
}

/// Draw one frame for `session` into `buf`.
///
/// # Errors
///
/// Propagates writer errors; an [`AppendBuffer`] never produces any.
pub fn draw_frame(session: &Session, banner: &str, buf: &mut AppendBuffer) -> io::Result<()> {
    ansi::cursor_hide(buf)?;
    ansi::cursor_home(buf)?;

    draw_rows(session.screen(), banner, buf)?;

    ansi::cursor_to(buf, session.cursor_x(), session.cursor_y())?;
    ansi::cursor_show(buf)
}

/// Draw every screen row.
///
/// # Errors
///
/// Propagates writer errors.
pub fn draw_rows(screen: Size, banner: &str, w: &mut impl Write) -> io::Result<()> {
    let banner_row = screen.rows / 3;

    for y in 0..screen.rows {
        if y == banner_row {
            draw_banner(screen.cols, banner, w)?;
        } else {
            w.write_all(&[MARKER])?;
        }

        ansi::clear_line_right(w)?;
        if y + 1 < screen.rows {
            w.write_all(b"\r\n")?;
        }
    }

    Ok(())
}

/// The banner, truncated to `cols` and centered. The marker takes the first
/// cell of the left padding.
fn draw_banner(cols: u16, banner: &str, w: &mut impl Write) -> io::Result<()> {
    let cols = usize::from(cols);
    let text = &banner.as_bytes()[..banner.len().min(cols)];

    let mut padding = (cols - text.len()) / 2;
    if padding > 0 {
        w.write_all(&[MARKER])?;
        padding -= 1;
    }
    w.write_all(" ".repeat(padding).as_bytes())?;

    w.write_all(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
