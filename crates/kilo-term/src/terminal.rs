// SPDX-License-Identifier: MIT
//
// Terminal mode control: raw mode with RAII restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), isatty, and raw fd writes. These are the standard POSIX
// interfaces for terminal control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// `RawMode::enable` snapshots the terminal's attributes, switches the line
// discipline to raw, and hands back a guard. The snapshot is the only value
// ever restored, and the guard restores it on drop, so every exit path
// (normal return, `?` propagation, unwinding) leaves the terminal as found.
//
// The attribute calls go through the `AttributeDevice` trait. The real
// device is stdin; tests drive the guard with an in-memory device so the
// enter/restore round trip can be checked without a TTY.
//
// Panics get one more layer: the stdin device keeps a process-wide copy of
// the snapshot and installs a panic hook that writes a screen reset straight
// to fd 1 and re-applies the snapshot before the default handler prints its
// message.

use std::io;
use std::sync::{Mutex, Once};

use tracing::{debug, info, warn};

use crate::ansi;
use crate::error::{Error, Result};

/// Snapshot of the terminal line-discipline configuration.
pub type Attributes = libc::termios;

/// Default inter-byte read timeout in deciseconds (raw-mode `VTIME`).
pub const DEFAULT_READ_TIMEOUT_DS: u8 = 1;

// ─── Attribute Devices ──────────────────────────────────────────────────────

/// Something whose terminal attributes can be read and written.
pub trait AttributeDevice {
    /// Read the current attributes (`tcgetattr`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the attributes cannot be read.
    fn get_attributes(&self) -> io::Result<Attributes>;

    /// Apply `attrs` (`tcsetattr`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the attributes cannot be applied.
    fn set_attributes(&self, attrs: &Attributes) -> io::Result<()>;

    /// Called once the original attributes have been captured.
    fn on_capture(&self, _original: &Attributes) {}

    /// Called once the original attributes have been restored.
    fn on_release(&self) {}
}

/// The controlling terminal, reached through stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinDevice;

impl AttributeDevice for StdinDevice {
    fn get_attributes(&self) -> io::Result<Attributes> {
        let mut attrs: Attributes = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(attrs)
    }

    fn set_attributes(&self, attrs: &Attributes) -> io::Result<()> {
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn on_capture(&self, original: &Attributes) {
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(*original);
        }
        install_panic_hook();
    }

    fn on_release(&self) {
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }
    }
}

/// Check whether stdin is connected to a terminal (TTY).
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Process-wide copy of the original termios for the panic hook, which
/// cannot reach the guard.
static TERMIOS_BACKUP: Mutex<Option<Attributes>> = Mutex::new(None);

/// Panic hook guard: ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Cursor back on, then clear and home.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[?25h\x1b[2J\x1b[H";

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            restore_termios_from_backup();
            original(info);
        }));
    });
}

/// Write the reset sequence directly to fd 1, bypassing the stdout lock in
/// case the panic happened while it was held.
fn emergency_restore() {
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }
}

/// Best-effort, ignores errors.
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            let _ = StdinDevice.set_attributes(original);
        }
    }
}

// ─── Raw Attributes ─────────────────────────────────────────────────────────

/// Derive raw-mode attributes from `original`.
///
/// - input: no break-to-SIGINT, no CR→NL, no parity check, no 8th-bit
///   strip, no XON/XOFF flow control
/// - output: no post-processing (`\n` is not expanded to `\r\n`)
/// - control: 8-bit characters
/// - local: no echo, no canonical (line) mode, no Ctrl-V extension, no
///   signal keys
/// - reads return after at most `read_timeout_ds` deciseconds with
///   whatever is available, possibly nothing (`VMIN = 0`)
///
/// A zero timeout would turn reads into a busy poll, so it is raised to 1.
#[must_use]
pub fn make_raw(original: &Attributes, read_timeout_ds: u8) -> Attributes {
    let mut raw = *original;
    raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag |= libc::CS8;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    raw.c_cc[libc::VMIN] = 0;
    raw.c_cc[libc::VTIME] = read_timeout_ds.max(1);
    raw
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode handle with RAII restore.
///
/// # Example
///
/// ```no_run
/// use kilo_term::terminal::{RawMode, StdinDevice, DEFAULT_READ_TIMEOUT_DS};
///
/// let mut raw = RawMode::enable(StdinDevice, DEFAULT_READ_TIMEOUT_DS)?;
/// // ... draw frames, read keys ...
/// raw.restore()?; // or just let it drop
/// # Ok::<(), kilo_term::Error>(())
/// ```
pub struct RawMode<D: AttributeDevice> {
    device: D,
    /// Attributes captured before raw mode was applied.
    original: Attributes,
    /// Whether raw mode is currently applied.
    active: bool,
}

impl<D: AttributeDevice> RawMode<D> {
    /// Snapshot the device's attributes and switch it to raw mode.
    ///
    /// # Errors
    ///
    /// - [`Error::TerminalQuery`] if the attributes cannot be read (for
    ///   example, stdin is not a terminal).
    /// - [`Error::TerminalConfig`] if raw mode cannot be applied. The
    ///   original attributes are re-applied on a best-effort basis first.
    pub fn enable(device: D, read_timeout_ds: u8) -> Result<Self> {
        let original = device.get_attributes().map_err(Error::TerminalQuery)?;
        device.on_capture(&original);

        let raw = make_raw(&original, read_timeout_ds);
        if let Err(e) = device.set_attributes(&raw) {
            warn!(error = %e, "raw mode rejected; restoring original attributes");
            let _ = device.set_attributes(&original);
            device.on_release();
            return Err(Error::TerminalConfig(e));
        }

        info!(read_timeout_ds = raw.c_cc[libc::VTIME], "raw mode entered");
        Ok(Self {
            device,
            original,
            active: true,
        })
    }

    /// Re-apply the captured attributes.
    ///
    /// Idempotent: after the first success, further calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TerminalConfig`] if the attributes cannot be
    /// applied. The guard stays active so drop will try again.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.device
            .set_attributes(&self.original)
            .map_err(Error::TerminalConfig)?;
        self.device.on_release();
        self.active = false;

        debug!("terminal attributes restored");
        Ok(())
    }

    /// Whether raw mode is currently applied.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The attributes that will be restored.
    #[inline]
    #[must_use]
    pub const fn original(&self) -> &Attributes {
        &self.original
    }

    /// The underlying device.
    #[inline]
    #[must_use]
    pub const fn device(&self) -> &D {
        &self.device
    }
}

impl<D: AttributeDevice> Drop for RawMode<D> {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.restore() {
                warn!(error = %e, "could not restore terminal attributes on drop");
            }
        }
    }
}

/// Clear the screen and home the cursor, ignoring errors.
///
/// Used on the way out of the process, where there is nothing left to do
/// about a failed write.
pub fn reset_screen_best_effort(w: &mut impl io::Write) {
    let _ = ansi::reset_screen(w);
    let _ = w.flush();
}

// ─── Tests ───────────────────────────────────────────────────────────────────
