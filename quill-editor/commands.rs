//! Cursor commands built from viewport primitives.

use crate::viewport::Viewport;

/// Lines scrolled per mouse wheel notch unless configured otherwise
pub const WHEEL_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }
}

pub fn move_to_line_start(viewport: &mut Viewport) {
    let line = viewport.cursor().line;
    viewport.set_cursor(0, line);
}

pub fn move_to_line_end(viewport: &mut Viewport) {
    let line = viewport.cursor().line;
    viewport.set_cursor(viewport.line_length(line), line);
}

pub fn move_to_document_start(viewport: &mut Viewport) {
    viewport.set_cursor(0, 0);
}

pub fn move_to_document_end(viewport: &mut Viewport) {
    let last = viewport.total_lines() - 1;
    viewport.set_cursor(viewport.line_length(last), last);
}

/// Move one screenful of text rows, a line at a time
pub fn page_move(viewport: &mut Viewport, direction: Direction) {
    for _ in 0..viewport.visible_rows() {
        viewport.move_cursor(0, direction.step());
    }
}

/// Jump over a word and the blanks after (or before) it.
///
/// Words are runs of anything but spaces and tabs. From the very end of a
/// line a forward move wraps to the start of the next one; from column 0 a
/// backward move wraps to the end of the previous one.
pub fn move_word(viewport: &mut Viewport, direction: Direction) {
    let cursor = viewport.cursor();
    let Some(text) = viewport.line_at(cursor.line) else {
        return;
    };
    let mut column = cursor.column.min(text.len());
    let mut line = cursor.line;

    match direction {
        Direction::Forward => {
            if column == text.len() {
                if line + 1 < viewport.total_lines() {
                    line += 1;
                    column = 0;
                }
            } else {
                while column < text.len() && !is_blank(text[column]) {
                    column += 1;
                }
                while column < text.len() && is_blank(text[column]) {
                    column += 1;
                }
            }
        }
        Direction::Backward => {
            if column == 0 {
                if line > 0 {
                    line -= 1;
                    column = viewport.line_length(line);
                }
            } else {
                while column > 0 && is_blank(text[column - 1]) {
                    column -= 1;
                }
                while column > 0 && !is_blank(text[column - 1]) {
                    column -= 1;
                }
            }
        }
    }

    viewport.set_cursor(column, line);
}

/// Place the cursor under a mouse press or drag at text-area cell `x`, `y`.
///
/// Clicks below the last line are ignored and return `false`; clicks past
/// the end of a line land at its end.
pub fn click(viewport: &mut Viewport, x: usize, y: usize) -> bool {
    let scroll = viewport.scroll_offset();
    let line = y.saturating_add(scroll.line);
    if line >= viewport.total_lines() {
        return false;
    }

    let column = x
        .saturating_add(scroll.column)
        .min(viewport.line_length(line));
    viewport.set_cursor(column, line);
    true
}

/// Scroll by `lines` for one wheel notch
pub fn wheel(viewport: &mut Viewport, direction: Direction, lines: usize) {
    let lines = isize::try_from(lines).unwrap_or(isize::MAX);
    viewport.scroll(0, direction.step() * lines);
}

fn is_blank(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}
