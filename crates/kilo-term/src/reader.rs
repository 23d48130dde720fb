// SPDX-License-Identifier: MIT
//
// Key input: one byte per key, retried across read timeouts.
//
// Raw mode is configured with `VMIN = 0, VTIME > 0`, so a read on the
// terminal comes back after a bounded wait even when nothing was typed.
// `read_key` hides that: an empty read, `EAGAIN` or `EINTR` just means
// "try again". Only a genuine failure reaches the caller.
//
// This is the one place the editor waits. Between frames the whole
// program sits in `read_key`; rendering and dispatch never block.

use std::io::{self, Read};

use crate::error::{Error, Result};

/// Reads single key bytes from any byte source.
///
/// # Example
///
/// ```no_run
/// use kilo_term::reader::KeyReader;
/// use kilo_term::tty::TtyInput;
///
/// let mut keys = KeyReader::new(TtyInput);
/// let key = keys.read_key()?;
/// # Ok::<(), kilo_term::Error>(())
/// ```
#[derive(Debug)]
pub struct KeyReader<R> {
    input: R,
}

impl<R: Read> KeyReader<R> {
    /// Wrap a byte source.
    #[must_use]
    pub const fn new(input: R) -> Self {
        Self { input }
    }

    /// Block until one byte arrives.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the read fails for any reason other than a
    /// timeout or an interrupted system call.
    pub fn read_key(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => {}
                Ok(_) => return Ok(byte[0]),
                Err(e) if is_retryable(&e) => {}
                Err(e) => return Err(Error::read(e)),
            }
        }
    }

    /// The wrapped byte source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.input
    }

    /// Unwrap the byte source.
    pub fn into_inner(self) -> R {
        self.input
    }
}

/// Timeouts and interruptions are not errors for a raw-mode read.
fn is_retryable(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// A byte source that plays back a script of read outcomes.
    struct Script(VecDeque<io::Result<Option<u8>>>);

    impl Read for Script {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                Some(Ok(Some(b))) => {
                    buf[0] = b;
                    Ok(1)
                }
                Some(Ok(None)) => Ok(0),
                Some(Err(e)) => Err(e),
                None => panic!("script exhausted"),
            }
        }
    }

    #[test]
    fn reads_bytes_in_order() {
        let mut keys = KeyReader::new(Cursor::new(b"wasd".to_vec()));
        let got: Vec<u8> = (0..4).map(|_| keys.read_key().unwrap()).collect();
        assert_eq!(got, b"wasd");
    }

    #[test]
    fn empty_reads_are_retried() {
        let script = Script(VecDeque::from([Ok(None), Ok(None), Ok(Some(b'x'))]));
        let mut keys = KeyReader::new(script);
        assert_eq!(keys.read_key().unwrap(), b'x');
        assert!(keys.get_mut().0.is_empty());
    }

    #[test]
    fn would_block_and_interrupt_are_retried() {
        let script = Script(VecDeque::from([
            Err(io::Error::from(io::ErrorKind::WouldBlock)),
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            Err(io::Error::from(io::ErrorKind::TimedOut)),
            Ok(Some(0x11)),
        ]));
        let mut keys = KeyReader::new(script);
        assert_eq!(keys.read_key().unwrap(), 0x11);
    }

    #[test]
    fn hard_failures_propagate_as_read_errors() {
        let script = Script(VecDeque::from([
            Ok(None),
            Err(io::Error::from(io::ErrorKind::BrokenPipe)),
        ]));
        let mut keys = KeyReader::new(script);
        let err = keys.read_key().unwrap_err();
        assert_eq!(err.operation(), "read");
        assert!(matches!(err, Error::Io { ref source, .. } if source.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn into_inner_returns_source() {
        let keys = KeyReader::new(Cursor::new(vec![1, 2, 3]));
        assert_eq!(keys.into_inner().into_inner(), vec![1, 2, 3]);
    }
}
