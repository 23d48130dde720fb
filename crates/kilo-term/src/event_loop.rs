// SPDX-License-Identifier: MIT
//
// Event loop: render, wait for one key, dispatch, repeat.
//
// Single-threaded and strictly sequenced:
//
//   ┌──────────┐   ┌──────────┐   ┌──────────┐
//   │  paint   │ → │ read_key │ → │  on_key  │ ─┐
//   └──────────┘   └──────────┘   └──────────┘  │
//        ▲                                      │
//        └──────────────────────────────────────┘
//
// Every frame is painted into a fresh `AppendBuffer` and handed to the
// output in one write. The only wait is inside `read_key`. There is no
// dirty tracking: a frame is cheap and the loop only turns over when a
// key arrives.
//
// On quit the loop clears the screen and homes the cursor, then returns.
// Restoring the terminal mode is the raw-mode guard's job, not ours.

use std::io::{Read, Write};

use tracing::{debug, info};

use crate::buffer::AppendBuffer;
use crate::error::{Error, Result};
use crate::reader::KeyReader;
use crate::terminal::reset_screen_best_effort;

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Leave the loop.
    Quit,
}

/// Application interface for the event loop.
pub trait App {
    /// Paint one full frame into `buf`.
    ///
    /// The buffer is empty on entry and is flushed in a single write after
    /// this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if composing the frame fails.
    fn paint(&mut self, buf: &mut AppendBuffer) -> std::io::Result<()>;

    /// React to one key byte.
    fn on_key(&mut self, key: u8) -> Action;
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop over an input and an output stream.
///
/// # Example
///
/// ```no_run
/// use kilo_term::buffer::AppendBuffer;
/// use kilo_term::event_loop::{Action, App, EventLoop};
/// use kilo_term::tty::{TtyInput, TtyOutput};
///
/// struct Tilde;
///
/// impl App for Tilde {
///     fn paint(&mut self, buf: &mut AppendBuffer) -> std::io::Result<()> {
///         buf.append(b"~");
///         Ok(())
///     }
///
///     fn on_key(&mut self, key: u8) -> Action {
///         if key == b'q' { Action::Quit } else { Action::Continue }
///     }
/// }
///
/// EventLoop::new(TtyInput, TtyOutput).run(&mut Tilde)?;
/// # Ok::<(), kilo_term::Error>(())
/// ```
pub struct EventLoop<R, W> {
    keys: KeyReader<R>,
    output: W,
    frames: u64,
}

impl<R: Read, W: Write> EventLoop<R, W> {
    /// Create a loop reading keys from `input` and drawing to `output`.
    #[must_use]
    pub const fn new(input: R, output: W) -> Self {
        Self {
            keys: KeyReader::new(input),
            output,
            frames: 0,
        }
    }

    /// Run until the application returns [`Action::Quit`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a frame cannot be written or a key cannot
    /// be read. The screen is left as it was; the caller owns the fatal
    /// exit path.
    pub fn run(&mut self, app: &mut impl App) -> Result<()> {
        loop {
            self.render(app)?;

            let key = self.keys.read_key()?;
            debug!(key, "key");

            if app.on_key(key) == Action::Quit {
                reset_screen_best_effort(&mut self.output);
                info!(frames = self.frames, "quit");
                return Ok(());
            }
        }
    }

    /// Paint one frame and write it out in one go.
    fn render(&mut self, app: &mut impl App) -> Result<()> {
        let mut frame = AppendBuffer::new();
        app.paint(&mut frame).map_err(Error::write)?;

        if frame.dropped_chunks() > 0 {
            debug!(dropped = frame.dropped_chunks(), "frame drawn with dropped chunks");
        }

        frame.flush_to(&mut self.output).map_err(Error::write)?;
        self.frames += 1;
        Ok(())
    }

    /// Frames written so far.
    #[inline]
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// The output stream.
    #[inline]
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.output
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Paints the key count; quits on `q`.
    #[derive(Default)]
    struct Counter {
        keys: Vec<u8>,
    }

    impl App for Counter {
        fn paint(&mut self, buf: &mut AppendBuffer) -> io::Result<()> {
            write!(buf, "[{}]", self.keys.len())
        }

        fn on_key(&mut self, key: u8) -> Action {
            self.keys.push(key);
            if key == b'q' {
                Action::Quit
            } else {
                Action::Continue
            }
        }
    }

    #[test]
    fn action_equality() {
        assert_eq!(Action::Continue, Action::Continue);
        assert_ne!(Action::Continue, Action::Quit);
    }

    #[test]
    fn renders_before_every_key_and_quits() {
        let mut app = Counter::default();
        let mut ev = EventLoop::new(Cursor::new(b"abq".to_vec()), Vec::new());
        ev.run(&mut app).unwrap();

        assert_eq!(app.keys, b"abq");
        assert_eq!(ev.frames(), 3);
        assert_eq!(ev.output().as_slice(), b"[0][1][2]\x1b[2J\x1b[H");
    }

    #[test]
    fn bytes_after_quit_are_not_consumed() {
        let mut app = Counter::default();
        let mut ev = EventLoop::new(Cursor::new(b"qzzz".to_vec()), Vec::new());
        ev.run(&mut app).unwrap();
        assert_eq!(app.keys, b"q");
    }

    #[test]
    fn read_failure_is_fatal() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            }
        }

        let mut ev = EventLoop::new(Failing, Vec::new());
        let err = ev.run(&mut Counter::default()).unwrap_err();
        assert_eq!(err.operation(), "read");
        assert_eq!(ev.frames(), 1);
    }

    #[test]
    fn write_failure_is_fatal() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut ev = EventLoop::new(Cursor::new(b"q".to_vec()), Closed);
        let err = ev.run(&mut Counter::default()).unwrap_err();
        assert_eq!(err.operation(), "write");
        assert_eq!(ev.frames(), 0);
    }
}
