// SPDX-License-Identifier: MIT
//
// kilo-term: Terminal layer for kilo.
//
// Everything that touches the terminal lives here: raw mode via termios,
// screen size via ioctl or a cursor-position probe, single-byte key reads
// that ride out raw-mode timeouts, and frame output batched into one write.
//
// Like the rest of kilo this speaks VT100 directly. No terminal framework
// sits between us and the escape sequences.

#[cfg(not(unix))]
compile_error!("kilo-term drives the terminal through termios and needs a Unix target");

pub mod ansi;
pub mod buffer;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod probe;
pub mod reader;
pub mod terminal;
pub mod tty;

pub use error::{Error, Result};
