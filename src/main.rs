// SPDX-License-Identifier: MIT
//
// kilo: a minimal raw-mode terminal editor.
//
// This is the main binary that wires together the crates:
//
//   kilo-term   → raw mode, geometry probing, key reads, event loop
//   kilo-editor → session state, key dispatch, frame rendering
//
// Startup and shutdown:
//
//   config → logging → raw mode on → probe size → event loop
//                         │                          │
//                         └──── restored on drop ◄───┘
//
// Each keypress flows through:
//
//   stdin → KeyReader → Editor::on_key → Session
//   Editor::paint → AppendBuffer → one write → terminal
//
// Every failure ends up in `die`: reset the screen, name the failed
// operation on stderr, exit 1. A clean quit exits 0. The raw-mode guard
// lives inside `run`, so it has been dropped (and the terminal restored)
// before either exit happens.

mod config;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use kilo_editor::Editor;
use kilo_term::Error;
use kilo_term::event_loop::EventLoop;
use kilo_term::geometry;
use kilo_term::terminal::{self, RawMode, StdinDevice};
use kilo_term::tty::{TtyInput, TtyOutput};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn main() {
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_logging(&config);
    info!(version = env!("CARGO_PKG_VERSION"), "kilo starting");
    if let Some(e) = config_error {
        warn!(error = %e, "ignoring config file; using defaults");
    }

    if let Err(e) = run(&config) {
        die(&e);
    }

    info!("kilo exited cleanly");
}

/// Raw mode, size, loop. Returns once the user quits.
fn run(config: &Config) -> Result<(), Error> {
    if !terminal::is_tty() {
        warn!("stdin is not a terminal");
    }

    let mut raw = RawMode::enable(StdinDevice, config.read_timeout_ds())?;

    let size = geometry::probe_size(
        geometry::os_window_size,
        &mut TtyInput,
        &mut TtyOutput,
        config.probe_scratch_len(),
    )?;

    let mut editor = Editor::new(size, config.banner());
    EventLoop::new(TtyInput, TtyOutput).run(&mut editor)?;

    raw.restore()
}

/// Reset the screen, report `err`, exit 1.
fn die(err: &Error) -> ! {
    terminal::reset_screen_best_effort(&mut TtyOutput);
    error!(operation = err.operation(), error = %err, "fatal");
    eprintln!("kilo: {err}");
    process::exit(1);
}

/// Log to `~/.kilo/kilo.log`, never to the terminal we draw on.
///
/// Best-effort: if the file cannot be opened the editor runs unlogged.
fn init_logging(config: &Config) {
    let log_path = config::kilo_dir()
        .map_or_else(|| PathBuf::from("kilo.log"), |dir| dir.join("kilo.log"));

    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
