// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Unbuffered handles on the terminal's file descriptors.
//
// `io::stdin()` sits behind an 8 KB `BufReader` and `io::stdout()` behind a
// `LineWriter`. Neither is what raw mode wants: the line writer splits a
// frame at every `\n` it contains, and the buffered reader can swallow the
// terminal's reply to a query before the probe sees it. These handles go
// straight to `read(2)` / `write(2)`.

use std::io::{self, Read, Write};

/// Raw reads from fd 0.
///
/// In raw mode with `VMIN = 0` a read returns `Ok(0)` when the `VTIME`
/// timeout passes with no input. That is a timeout, not end-of-file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TtyInput;

impl Read for TtyInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        Ok(n as usize)
    }
}

/// Raw writes to fd 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct TtyOutput;

impl Write for TtyOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe {
            libc::write(
                libc::STDOUT_FILENO,
                buf.as_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        Ok(n as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        // Nothing buffered on our side.
        Ok(())
    }
}
