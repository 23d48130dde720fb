//! Key bytes → editor actions.
//!
//! Input arrives one byte per key. Control keys are the letter with the top
//! three bits cleared (`Ctrl-Q` is `b'q' & 0x1f` = `0x11`), which is what
//! the terminal sends in raw mode with `ISIG`/`IXON` off.
//!
//! | Byte     | Key      | Effect              |
//! |----------|----------|---------------------|
//! | `0x11`   | `Ctrl-Q` | quit                |
//! | `w`      |          | cursor up           |
//! | `a`      |          | cursor left         |
//! | `s`      |          | cursor down         |
//! | `d`      |          | cursor right        |
//! | anything |          | ignored             |
//!
//! Each movement key moves exactly one step in exactly one direction.

use kilo_term::event_loop::Action;

use crate::session::{Direction, Session};

/// The control-key byte for an ASCII letter.
#[inline]
#[must_use]
pub const fn ctrl_key(letter: u8) -> u8 {
    letter & 0x1f
}

/// `Ctrl-Q`.
pub const QUIT: u8 = ctrl_key(b'q');

/// A classified key byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Quit,
    Move(Direction),
    Other(u8),
}

impl Key {
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            QUIT => Self::Quit,
            b'w' => Self::Move(Direction::Up),
            b'a' => Self::Move(Direction::Left),
            b's' => Self::Move(Direction::Down),
            b'd' => Self::Move(Direction::Right),
            other => Self::Other(other),
        }
    }
}

/// Apply one key byte to the session.
pub fn handle_key(byte: u8, session: &mut Session) -> Action {
    match Key::from_byte(byte) {
        Key::Quit => Action::Quit,
        Key::Move(dir) => {
            session.move_cursor(dir);
            Action::Continue
        }
        Key::Other(_) => Action::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kilo_term::geometry::Size;

    fn session() -> Session {
        Session::new(Size { cols: 80, rows: 24 })
    }

    #[test]
    fn ctrl_masks_to_low_five_bits() {
        assert_eq!(ctrl_key(b'q'), 0x11);
        assert_eq!(ctrl_key(b'a'), 0x01);
        assert_eq!(ctrl_key(b'z'), 0x1a);
        assert_eq!(ctrl_key(b'Q'), 0x11);
    }

    #[test]
    fn classifies_bytes() {
        assert_eq!(Key::from_byte(0x11), Key::Quit);
        assert_eq!(Key::from_byte(b'w'), Key::Move(Direction::Up));
        assert_eq!(Key::from_byte(b'a'), Key::Move(Direction::Left));
        assert_eq!(Key::from_byte(b's'), Key::Move(Direction::Down));
        assert_eq!(Key::from_byte(b'd'), Key::Move(Direction::Right));
        assert_eq!(Key::from_byte(b'q'), Key::Other(b'q'));
        assert_eq!(Key::from_byte(b'W'), Key::Other(b'W'));
    }

    #[test]
    fn quit_key_quits_without_moving() {
        let mut s = session();
        assert_eq!(handle_key(QUIT, &mut s), Action::Quit);
        assert_eq!(s, session());
    }

    #[test]
    fn each_movement_key_moves_exactly_one_axis() {
        let mut s = session();
        assert_eq!(handle_key(b's', &mut s), Action::Continue);
        assert_eq!((s.cursor_x(), s.cursor_y()), (0, 1));

        assert_eq!(handle_key(b'd', &mut s), Action::Continue);
        assert_eq!((s.cursor_x(), s.cursor_y()), (1, 1));

        assert_eq!(handle_key(b'w', &mut s), Action::Continue);
        assert_eq!((s.cursor_x(), s.cursor_y()), (1, 0));

        assert_eq!(handle_key(b'a', &mut s), Action::Continue);
        assert_eq!((s.cursor_x(), s.cursor_y()), (0, 0));
    }

    #[test]
    fn other_bytes_are_ignored() {
        let mut s = session();
        for byte in [0x17, 0x13, b'x', b'\r', 0x1b, 0xff] {
            assert_eq!(handle_key(byte, &mut s), Action::Continue);
        }
        assert_eq!(s, session());
    }
}
