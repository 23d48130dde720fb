//! The editor: session, key dispatch, and rendering behind kilo-term's
//! [`App`] trait.

use std::io;

use kilo_term::buffer::AppendBuffer;
use kilo_term::event_loop::{Action, App};
use kilo_term::geometry::Size;
use tracing::debug;

use crate::keys;
use crate::render;
use crate::session::Session;

/// A running editor.
#[derive(Debug)]
pub struct Editor {
    session: Session,
    banner: String,
}

impl Editor {
    /// An editor for a screen of `size`, showing `banner`.
    #[must_use]
    pub fn new(size: Size, banner: impl Into<String>) -> Self {
        Self {
            session: Session::new(size),
            banner: banner.into(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn banner(&self) -> &str {
        &self.banner
    }
}

impl App for Editor {
    fn paint(&mut self, buf: &mut AppendBuffer) -> io::Result<()> {
        render::draw_frame(&self.session, &self.banner, buf)
    }

    fn on_key(&mut self, key: u8) -> Action {
        let action = keys::handle_key(key, &mut self.session);
        debug!(
            key,
            x = self.session.cursor_x(),
            y = self.session.cursor_y(),
            ?action,
            "dispatched"
        );
        action
    }
}
