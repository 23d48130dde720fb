// SPDX-License-Identifier: MIT
//
// Append buffer: one frame of output, written in a single `write()`.
//
// Every escape sequence and glyph of a frame is accumulated here first.
// The terminal never observes a half-drawn frame because nothing reaches
// it until `flush_to` hands the whole buffer over in one call.
//
// Appends are best-effort. If the buffer cannot grow (allocation failure,
// or the optional byte limit would be exceeded) the chunk is dropped whole
// and earlier content is left untouched. A dropped chunk costs at most one
// cosmetically wrong frame; it is counted and logged rather than returned
// as an error.

use std::io::{self, Write};

use tracing::warn;

/// A growable byte accumulator for a single frame.
///
/// Created fresh per frame and consumed by [`flush_to`](Self::flush_to).
/// Nothing carries over between frames.
#[derive(Debug, Default)]
pub struct AppendBuffer {
    buf: Vec<u8>,
    /// Upper bound on `buf.len()`. `None` means "whatever the allocator
    /// gives us".
    limit: Option<usize>,
    /// Chunks discarded because the buffer could not grow.
    dropped: usize,
}

impl AppendBuffer {
    /// Create an empty buffer. No storage is allocated until the first
    /// append.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            limit: None,
            dropped: 0,
        }
    }

    /// Create an empty buffer that refuses to grow past `limit` bytes.
    ///
    /// Hitting the limit behaves exactly like an allocation failure: the
    /// offending chunk is dropped and counted.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            buf: Vec::new(),
            limit: Some(limit),
            dropped: 0,
        }
    }

    /// Append `bytes` to the end of the buffer.
    ///
    /// Returns `false` if the chunk was dropped because the buffer could
    /// not grow. The buffer is unchanged in that case.
    pub fn append(&mut self, bytes: &[u8]) -> bool {
        if bytes.is_empty() {
            return true;
        }

        let over_limit = self
            .limit
            .is_some_and(|limit| self.buf.len().saturating_add(bytes.len()) > limit);

        if over_limit || self.buf.try_reserve(bytes.len()).is_err() {
            self.dropped += 1;
            warn!(
                chunk = bytes.len(),
                held = self.buf.len(),
                dropped = self.dropped,
                "append buffer could not grow; chunk dropped"
            );
            return false;
        }

        self.buf.extend_from_slice(bytes);
        true
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// How many chunks have been dropped since creation.
    #[inline]
    #[must_use]
    pub const fn dropped_chunks(&self) -> usize {
        self.dropped
    }

    /// Discard the content and release the backing storage.
    pub fn clear(&mut self) {
        self.buf = Vec::new();
    }

    /// Write the whole frame to `w` in one `write_all` and flush it.
    ///
    /// Takes `self` by value: a frame is written exactly once and its
    /// storage is released when this returns, on success or failure.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `w` fails.
    pub fn flush_to(self, w: &mut impl Write) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        w.write_all(&self.buf)?;
        w.flush()
    }
}

/// `Write` adapter so the [`ansi`](crate::ansi) helpers can target the
/// buffer directly.
///
/// Inherits the best-effort policy: a dropped chunk still reports success,
/// so a single failed append never aborts the rest of the frame.
impl Write for AppendBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing happens in flush_to().
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
