//! # kilo-editor: Editor core for kilo
//!
//! - **[`session`]**: `Session`, the cursor position and screen size
//! - **[`keys`]**: key byte classification and dispatch
//! - **[`render`]**: frame composition (rows, banner, cursor placement)
//! - **[`editor`]**: `Editor`, the event-loop `App` tying them together
//!
//! There is no text buffer yet. Every row is an empty placeholder, so the
//! renderer draws markers and a welcome banner.

pub mod editor;
pub mod keys;
pub mod render;
pub mod session;

pub use editor::Editor;
pub use render::default_banner;
