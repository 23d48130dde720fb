//! Session: cursor position and screen size for one run of the editor.
//!
//! Created once, after the screen size is known, and kept for the life of
//! the process. Only key dispatch moves the cursor; the renderer only reads.
//!
//! The cursor is 0-indexed and always stays on screen: moves saturate at
//! column/row 0 and at `cols - 1` / `rows - 1`.

use kilo_term::geometry::Size;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One step of cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Per-run editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    cursor_x: u16,
    cursor_y: u16,
    screen: Size,
}

impl Session {
    /// A session with the cursor at the top-left corner.
    #[must_use]
    pub const fn new(screen: Size) -> Self {
        Self {
            cursor_x: 0,
            cursor_y: 0,
            screen,
        }
    }

    /// Cursor column, 0-indexed.
    #[must_use]
    pub const fn cursor_x(&self) -> u16 {
        self.cursor_x
    }

    /// Cursor row, 0-indexed.
    #[must_use]
    pub const fn cursor_y(&self) -> u16 {
        self.cursor_y
    }

    #[must_use]
    pub const fn screen(&self) -> Size {
        self.screen
    }

    #[must_use]
    pub const fn screen_rows(&self) -> u16 {
        self.screen.rows
    }

    #[must_use]
    pub const fn screen_cols(&self) -> u16 {
        self.screen.cols
    }

    /// Move the cursor one cell in `dir`, staying on screen.
    pub const fn move_cursor(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.cursor_y = self.cursor_y.saturating_sub(1),
            Direction::Left => self.cursor_x = self.cursor_x.saturating_sub(1),
            Direction::Down => {
                if self.cursor_y + 1 < self.screen.rows {
                    self.cursor_y += 1;
                }
            }
            Direction::Right => {
                if self.cursor_x + 1 < self.screen.cols {
                    self.cursor_x += 1;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn session(cols: u16, rows: u16) -> Session {
        Session::new(Size { cols, rows })
    }

    #[test]
    fn starts_at_origin() {
        let s = session(80, 24);
        assert_eq!((s.cursor_x(), s.cursor_y()), (0, 0));
        assert_eq!(s.screen_cols(), 80);
        assert_eq!(s.screen_rows(), 24);
    }

    #[test]
    fn each_direction_moves_one_step() {
        let mut s = session(80, 24);
        s.move_cursor(Direction::Down);
        assert_eq!((s.cursor_x(), s.cursor_y()), (0, 1));
        s.move_cursor(Direction::Right);
        assert_eq!((s.cursor_x(), s.cursor_y()), (1, 1));
        s.move_cursor(Direction::Up);
        assert_eq!((s.cursor_x(), s.cursor_y()), (1, 0));
        s.move_cursor(Direction::Left);
        assert_eq!((s.cursor_x(), s.cursor_y()), (0, 0));
    }

    #[test]
    fn saturates_at_top_left() {
        let mut s = session(80, 24);
        s.move_cursor(Direction::Up);
        s.move_cursor(Direction::Left);
        assert_eq!((s.cursor_x(), s.cursor_y()), (0, 0));
    }

    #[test]
    fn saturates_at_bottom_right() {
        let mut s = session(3, 2);
        for _ in 0..10 {
            s.move_cursor(Direction::Right);
            s.move_cursor(Direction::Down);
        }
        assert_eq!((s.cursor_x(), s.cursor_y()), (2, 1));
    }

    #[test]
    fn single_cell_screen_never_moves() {
        let mut s = session(1, 1);
        s.move_cursor(Direction::Right);
        s.move_cursor(Direction::Down);
        assert_eq!((s.cursor_x(), s.cursor_y()), (0, 0));
    }
}
