/// A logical position in a document: zero-based line and byte column.
///
/// `column` may equal the line length, meaning "after the last character".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A position relative to the top-left corner of the text area.
///
/// Signed because a content offset scrolled out of view maps to negative
/// coordinates; callers check [`ScreenOffset::is_within`] before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenOffset {
    pub x: isize,
    pub y: isize,
}

impl ScreenOffset {
    pub fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    /// Whether this offset falls inside a `rows` x `cols` window.
    pub fn is_within(&self, rows: usize, cols: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < cols && (self.y as usize) < rows
    }
}
