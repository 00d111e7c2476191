//! View layer: line index, cursor and scroll state over a content snapshot.
//!
//! The viewport never holds a reference to the text storage. It observes
//! mutations only through [`Viewport::refresh`], which re-reads the full
//! content and rebuilds the line index, so the snapshot is never trusted
//! across a mutation.
//!
//! After every public operation two predicates hold: the cursor lies inside
//! the document (`line < total_lines`, `column <= line_length(line)`), and
//! the cursor lies inside the visible window. Bad coordinates are clamped,
//! never reported.

use quill_core::location::{Position, ScreenOffset};

/// Anything the viewport can take a full-content snapshot of
pub trait ContentSource {
    fn read_content(&self) -> Vec<u8>;
}

/// Origin of the visible window within the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scroll {
    /// First visible column
    pub column: usize,
    /// First visible line
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportOptions {
    /// Remember the column a vertical move started from, so passing through
    /// a short line does not lose it. Off by default.
    pub sticky_column: bool,
}

/// Geometry of a one-column scrollbar along the text rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scrollbar {
    pub track_len: usize,
    pub thumb_start: usize,
    pub thumb_len: usize,
}

impl Scrollbar {
    pub fn is_thumb(&self, row: usize) -> bool {
        row >= self.thumb_start && row < self.thumb_start + self.thumb_len
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    cursor: Position,
    /// Column a run of vertical moves is aiming for (sticky mode only)
    desired_column: Option<usize>,
    scroll: Scroll,
    /// Display rows, including the status line
    rows: usize,
    /// Text columns
    cols: usize,
    content: Vec<u8>,
    /// Byte offset of the first byte of every line; never empty
    line_starts: Vec<usize>,
    options: ViewportOptions,
}

impl Viewport {
    /// Create a viewport over `source` sized `rows` x `cols`
    pub fn attach<S: ContentSource + ?Sized>(source: &S, rows: usize, cols: usize) -> Self {
        Self::attach_with(source, rows, cols, ViewportOptions::default())
    }

    pub fn attach_with<S: ContentSource + ?Sized>(
        source: &S,
        rows: usize,
        cols: usize,
        options: ViewportOptions,
    ) -> Self {
        let mut viewport = Self {
            cursor: Position::default(),
            desired_column: None,
            scroll: Scroll::default(),
            rows,
            cols,
            content: Vec::new(),
            line_starts: vec![0],
            options,
        };
        viewport.refresh(source);
        viewport
    }

    /// Re-read the content and rebuild the line index.
    ///
    /// Must be called after every mutation of the source. The cursor is
    /// pulled back inside the document if the content shrank under it.
    pub fn refresh<S: ContentSource + ?Sized>(&mut self, source: &S) {
        self.content = source.read_content();
        self.line_starts = index_lines(&self.content);

        let line = self.cursor.line.min(self.last_line());
        let column = self.cursor.column.min(self.line_length(line));
        self.cursor = Position::new(line, column);
        self.ensure_cursor_visible();
    }

    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.ensure_cursor_visible();
    }

    /// Move the cursor by a relative amount.
    ///
    /// The column is resolved against the destination line, so moving into a
    /// shorter line shortens the column. Without sticky mode the shortened
    /// column is where the next move starts from.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let vertical_only = dx == 0 && dy != 0;
        let sticky = self.options.sticky_column && vertical_only;

        let line = self.cursor.line.saturating_add_signed(dy).min(self.last_line());
        let start_column = if sticky {
            *self.desired_column.get_or_insert(self.cursor.column)
        } else {
            self.desired_column = None;
            self.cursor.column
        };
        let column = start_column
            .saturating_add_signed(dx)
            .min(self.line_length(line));

        self.cursor = Position::new(line, column);
        self.ensure_cursor_visible();
    }

    /// Place the cursor at an absolute `column`, `line`, clamped to the document
    pub fn set_cursor(&mut self, column: usize, line: usize) {
        let line = line.min(self.last_line());
        let column = column.min(self.line_length(line));

        self.cursor = Position::new(line, column);
        self.desired_column = None;
        self.ensure_cursor_visible();
    }

    /// Move the visible window by a relative amount.
    ///
    /// Horizontal scroll floors at 0 with no fixed ceiling. Vertical scroll
    /// is pinned to 0 while the whole document fits, otherwise capped so the
    /// last line may sit at the top row. The cursor follows the window as
    /// far as its line allows; if its line ends left of the window, the
    /// window comes back to the cursor.
    pub fn scroll(&mut self, dx: isize, dy: isize) {
        self.scroll.column = self.scroll.column.saturating_add_signed(dx);
        self.scroll.line = self.scroll.line.saturating_add_signed(dy);
        self.clamp_scroll();
        self.follow_scroll();
    }

    /// Scroll just enough to bring the cursor into the visible window
    pub fn ensure_cursor_visible(&mut self) {
        let rows = self.visible_rows();
        let cols = self.visible_cols();

        if self.cursor.line < self.scroll.line {
            self.scroll.line = self.cursor.line;
        } else if self.cursor.line >= self.scroll.line + rows {
            self.scroll.line = self.cursor.line + 1 - rows;
        }

        if self.cursor.column < self.scroll.column {
            self.scroll.column = self.cursor.column;
        } else if self.cursor.column >= self.scroll.column.saturating_add(cols) {
            self.scroll.column = self.cursor.column + 1 - cols;
        }

        self.clamp_scroll();
    }

    /// Text of line `n` without its newline
    pub fn line_at(&self, n: usize) -> Option<&[u8]> {
        let start = *self.line_starts.get(n)?;
        Some(&self.content[start..start + self.line_length(n)])
    }

    /// Length of line `n` excluding its newline; 0 if there is no such line
    pub fn line_length(&self, n: usize) -> usize {
        let Some(&start) = self.line_starts.get(n) else {
            return 0;
        };
        match self.line_starts.get(n + 1) {
            Some(&next) => next - 1 - start,
            None => self.content.len() - start,
        }
    }

    /// Content offset under a text-area cell.
    ///
    /// Returns 0 when the row maps past the last line, so callers that care
    /// must check the row against [`Viewport::total_lines`] first. The column
    /// is not clamped to the line length.
    pub fn screen_to_content_offset(&self, screen_x: usize, screen_y: usize) -> usize {
        let line = screen_y.saturating_add(self.scroll.line);
        match self.line_starts.get(line) {
            Some(&start) => start
                .saturating_add(screen_x)
                .saturating_add(self.scroll.column),
            None => 0,
        }
    }

    /// Text-area cell of a content offset.
    ///
    /// Offsets scrolled out of view give coordinates outside the window,
    /// possibly negative; nothing is clamped.
    pub fn content_offset_to_screen(&self, offset: usize) -> ScreenOffset {
        let line = self.line_of(offset);
        let line_start = self.line_starts[line];

        ScreenOffset::new(
            offset as isize - line_start as isize - self.scroll.column as isize,
            line as isize - self.scroll.line as isize,
        )
    }

    /// Content offset of the cursor
    pub fn cursor_offset(&self) -> usize {
        self.line_starts[self.cursor.line] + self.cursor.column
    }

    /// Logical position of a content offset, clamped to the document
    pub fn position_of(&self, offset: usize) -> Position {
        let line = self.line_of(offset);
        let column = (offset - self.line_starts[line]).min(self.line_length(line));
        Position::new(line, column)
    }

    /// Visible lines with their line numbers, each clipped to the visible columns
    pub fn visible_lines(&self) -> impl Iterator<Item = (usize, &[u8])> + '_ {
        let first = self.scroll.line;
        let last = (first + self.visible_rows()).min(self.total_lines());
        let (left, width) = (self.scroll.column, self.visible_cols());

        (first..last).filter_map(move |n| {
            let text = self.line_at(n)?;
            let start = left.min(text.len());
            let end = left.saturating_add(width).min(text.len());
            Some((n, &text[start..end]))
        })
    }

    /// Scrollbar geometry, or `None` while the whole document fits
    pub fn scrollbar(&self) -> Option<Scrollbar> {
        let track_len = self.visible_rows();
        let total = self.total_lines();
        if total <= track_len {
            return None;
        }

        let thumb_len = (track_len * track_len / total).max(1);
        let thumb_start =
            ((track_len - thumb_len) * self.scroll.line / (total - 1).max(1)).min(track_len - thumb_len);

        Some(Scrollbar {
            track_len,
            thumb_start,
            thumb_len,
        })
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn scroll_offset(&self) -> Scroll {
        self.scroll
    }

    pub fn total_lines(&self) -> usize {
        self.line_starts.len()
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Rows available for text: the display rows minus the status line, at least 1
    pub fn visible_rows(&self) -> usize {
        self.rows.saturating_sub(1).max(1)
    }

    fn visible_cols(&self) -> usize {
        self.cols.max(1)
    }

    pub fn options(&self) -> ViewportOptions {
        self.options
    }

    fn last_line(&self) -> usize {
        self.line_starts.len() - 1
    }

    fn line_of(&self, offset: usize) -> usize {
        // line_starts[0] == 0, so the partition point is at least 1
        self.line_starts.partition_point(|&start| start <= offset) - 1
    }

    fn clamp_scroll(&mut self) {
        if self.total_lines() <= self.visible_rows() {
            self.scroll.line = 0;
        } else {
            self.scroll.line = self.scroll.line.min(self.last_line());
        }
    }

    /// Pull the cursor into the window after the window moved
    fn follow_scroll(&mut self) {
        let top = self.scroll.line;
        let bottom = (top + self.visible_rows() - 1).min(self.last_line());
        let line = self.cursor.line.clamp(top, bottom);

        let len = self.line_length(line);
        let left = self.scroll.column.min(len);
        let right = self
            .scroll
            .column
            .saturating_add(self.visible_cols() - 1)
            .min(len);
        let column = self.cursor.column.clamp(left, right);

        // The line ends left of the window
        if column < self.scroll.column {
            self.scroll.column = column;
        }

        if (line, column) != (self.cursor.line, self.cursor.column) {
            self.desired_column = None;
        }
        self.cursor = Position::new(line, column);
    }
}

/// Offsets at which each line starts: 0, then one past every newline
fn index_lines(content: &[u8]) -> Vec<usize> {
    std::iter::once(0)
        .chain(memchr::memchr_iter(b'\n', content).map(|newline| newline + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use crate::piece_table::PieceTable;

    fn viewport(content: &str, rows: usize, cols: usize) -> Viewport {
        Viewport::attach(&PieceTable::new(content), rows, cols)
    }

    fn numbered_lines(count: usize) -> String {
        (0..count).map(|i| format!("line {}\n", i)).collect()
    }

    fn assert_invariants(vp: &Viewport) {
        let cursor = vp.cursor();
        let scroll = vp.scroll_offset();
        assert!(cursor.line < vp.total_lines(), "cursor line out of range");
        assert!(cursor.column <= vp.line_length(cursor.line), "cursor column out of range");
        assert!(cursor.line >= scroll.line);
        assert!(cursor.line < scroll.line + vp.visible_rows());
        assert!(cursor.column >= scroll.column);
        assert!(cursor.column < scroll.column.saturating_add(vp.size().1.max(1)));
    }

    #[test]
    fn test_line_index_with_trailing_newline() {
        let vp = viewport("ab\ncd\n", 24, 80);
        assert_eq!(vp.total_lines(), 3);
        assert_eq!(vp.line_length(0), 2);
        assert_eq!(vp.line_length(1), 2);
        assert_eq!(vp.line_length(2), 0);
        assert_eq!(vp.line_at(0), Some(&b"ab"[..]));
        assert_eq!(vp.line_at(1), Some(&b"cd"[..]));
        assert_eq!(vp.line_at(2), Some(&b""[..]));
        assert_eq!(vp.line_at(3), None);
        assert_eq!(vp.line_length(3), 0);
    }

    #[test]
    fn test_line_index_unterminated() {
        let vp = viewport("one\ntwo", 24, 80);
        assert_eq!(vp.total_lines(), 2);
        assert_eq!(vp.line_at(1), Some(&b"two"[..]));
        assert_eq!(vp.line_length(1), 3);
    }

    #[test]
    fn test_empty_document_has_one_line() {
        let vp = viewport("", 24, 80);
        assert_eq!(vp.total_lines(), 1);
        assert_eq!(vp.line_length(0), 0);
        assert_eq!(vp.cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_move_up_at_top_is_clamped() {
        let mut vp = viewport("only line", 24, 80);
        vp.move_cursor(0, -1);
        assert_eq!(vp.cursor(), Position::new(0, 0));
        assert_invariants(&vp);
    }

    #[test]
    fn test_move_cursor_clamps_column_to_destination_line() {
        let mut vp = viewport("a long line\nab\nanother long line", 24, 80);
        vp.set_cursor(8, 0);
        vp.move_cursor(0, 1);
        assert_eq!(vp.cursor(), Position::new(1, 2));

        // Without sticky column the shortened column carries on
        vp.move_cursor(0, 1);
        assert_eq!(vp.cursor(), Position::new(2, 2));
    }

    #[test]
    fn test_sticky_column_survives_short_line() {
        let table = PieceTable::new("a long line\nab\nanother long line");
        let mut vp = Viewport::attach_with(
            &table,
            24,
            80,
            ViewportOptions {
                sticky_column: true,
            },
        );
        vp.set_cursor(8, 0);
        vp.move_cursor(0, 1);
        assert_eq!(vp.cursor(), Position::new(1, 2));
        vp.move_cursor(0, 1);
        assert_eq!(vp.cursor(), Position::new(2, 8));

        // A horizontal move forgets the target
        vp.move_cursor(-1, 0);
        vp.move_cursor(0, -1);
        assert_eq!(vp.cursor(), Position::new(1, 2));
        vp.move_cursor(0, -1);
        assert_eq!(vp.cursor(), Position::new(0, 7));
    }

    #[test]
    fn test_move_cursor_horizontal_bounds() {
        let mut vp = viewport("abc\ndef", 24, 80);
        vp.move_cursor(-5, 0);
        assert_eq!(vp.cursor(), Position::new(0, 0));
        vp.move_cursor(10, 0);
        assert_eq!(vp.cursor(), Position::new(0, 3));
        vp.move_cursor(0, 10);
        assert_eq!(vp.cursor(), Position::new(1, 3));
    }

    #[test]
    fn test_set_cursor_clamps() {
        let mut vp = viewport("abc\nde", 24, 80);
        vp.set_cursor(100, 100);
        assert_eq!(vp.cursor(), Position::new(1, 2));
        assert_invariants(&vp);
    }

    #[test]
    fn test_scroll_clamps_to_last_line() {
        let mut vp = viewport(&numbered_lines(99), 24, 80);
        // 99 newlines -> 100 lines, the last one empty
        assert_eq!(vp.total_lines(), 100);
        vp.scroll(0, 1000);
        assert_eq!(vp.scroll_offset().line, 99);
        assert_invariants(&vp);

        vp.scroll(0, -1000);
        assert_eq!(vp.scroll_offset().line, 0);
        assert_invariants(&vp);
    }

    #[test]
    fn test_scroll_pinned_when_content_fits() {
        let mut vp = viewport("a\nb\nc", 24, 80);
        vp.scroll(0, 5);
        assert_eq!(vp.scroll_offset().line, 0);
        assert_invariants(&vp);
    }

    #[test]
    fn test_scroll_pulls_cursor_along() {
        let mut vp = viewport(&numbered_lines(50), 11, 80);
        vp.scroll(0, 20);
        assert_eq!(vp.scroll_offset().line, 20);
        assert_eq!(vp.cursor().line, 20);
        assert_invariants(&vp);

        vp.set_cursor(0, 29);
        vp.scroll(0, -15);
        assert_eq!(vp.scroll_offset().line, 5);
        assert_eq!(vp.cursor().line, 14);
        assert_invariants(&vp);
    }

    #[test]
    fn test_horizontal_scroll_along_long_line() {
        let mut vp = viewport(&"x".repeat(200), 24, 10);
        vp.scroll(50, 0);
        assert_eq!(vp.scroll_offset().column, 50);
        assert_eq!(vp.cursor().column, 50);
        assert_invariants(&vp);

        vp.scroll(-1000, 0);
        assert_eq!(vp.scroll_offset().column, 0);
        assert_eq!(vp.cursor().column, 9);
        assert_invariants(&vp);
    }

    #[test]
    fn test_horizontal_scroll_stops_at_short_line() {
        let mut vp = viewport("short", 24, 10);
        vp.scroll(100, 0);
        assert_eq!(vp.cursor().column, 5);
        assert_eq!(vp.scroll_offset().column, 5);
        assert_invariants(&vp);
    }

    #[test]
    fn test_vertical_scroll_brings_window_back_to_short_line() {
        let mut content = "y".repeat(200);
        for _ in 0..50 {
            content.push_str("\na");
        }
        let mut vp = viewport(&content, 11, 40);
        vp.set_cursor(150, 0);
        assert_eq!(vp.scroll_offset(), Scroll { column: 111, line: 0 });

        vp.scroll(0, 20);
        assert_eq!(vp.cursor(), Position::new(20, 1));
        assert_eq!(vp.scroll_offset(), Scroll { column: 1, line: 20 });
        assert_invariants(&vp);
    }

    #[test]
    fn test_huge_horizontal_scroll_does_not_overflow() {
        let mut vp = viewport("abc\ndef", 24, 80);
        vp.scroll(isize::MAX, 0);
        vp.scroll(isize::MAX, 0);
        assert_invariants(&vp);
        // The window stops where the cursor's line ends
        assert_eq!(vp.cursor(), Position::new(0, 3));
        assert_eq!(vp.scroll_offset().column, 3);

        let lines: Vec<(usize, &[u8])> = vp.visible_lines().collect();
        assert_eq!(lines, vec![(0, &b""[..]), (1, &b""[..])]);

        vp.move_cursor(isize::MAX, 0);
        vp.scroll(isize::MAX, isize::MAX);
        assert_invariants(&vp);
    }

    #[test]
    fn test_ensure_visible_vertical() {
        let mut vp = viewport(&numbered_lines(100), 11, 80);
        vp.set_cursor(0, 50);
        // 10 text rows: line 50 sits at the bottom row
        assert_eq!(vp.scroll_offset().line, 41);
        vp.set_cursor(0, 10);
        assert_eq!(vp.scroll_offset().line, 10);
        assert_invariants(&vp);
    }

    #[test]
    fn test_ensure_visible_horizontal() {
        let long = "x".repeat(200);
        let mut vp = viewport(&long, 24, 80);
        vp.set_cursor(150, 0);
        assert_eq!(vp.scroll_offset().column, 71);
        vp.set_cursor(20, 0);
        assert_eq!(vp.scroll_offset().column, 20);
        assert_invariants(&vp);
    }

    #[test]
    fn test_resize_keeps_cursor_visible() {
        let mut vp = viewport(&numbered_lines(100), 50, 80);
        vp.set_cursor(0, 40);
        assert_eq!(vp.scroll_offset().line, 0);
        vp.resize(11, 80);
        assert_eq!(vp.scroll_offset().line, 31);
        assert_invariants(&vp);
    }

    #[test]
    fn test_tiny_viewport_does_not_underflow() {
        let mut vp = viewport(&numbered_lines(10), 0, 0);
        vp.set_cursor(3, 5);
        assert_eq!(vp.scroll_offset(), Scroll { column: 3, line: 5 });
        assert_invariants(&vp);
    }

    #[test]
    fn test_refresh_after_shrink_clamps_cursor() {
        let mut table = PieceTable::new("first\nsecond\nthird");
        let mut vp = Viewport::attach(&table, 24, 80);
        vp.set_cursor(5, 2);

        table.delete(5, 13);
        vp.refresh(&table);
        assert_eq!(vp.total_lines(), 1);
        assert_eq!(vp.cursor(), Position::new(0, 5));
        assert_invariants(&vp);
    }

    #[test]
    fn test_screen_to_content_offset() {
        let mut vp = viewport(&numbered_lines(40), 11, 80);
        assert_eq!(vp.screen_to_content_offset(2, 1), 9);

        vp.scroll(0, 3);
        // Row 0 is now line 3, which starts at byte 21
        assert_eq!(vp.screen_to_content_offset(0, 0), 21);
        // Past the document
        assert_eq!(vp.screen_to_content_offset(0, 500), 0);
    }

    #[test]
    fn test_content_offset_to_screen() {
        let mut vp = viewport("ab\ncd\nef", 2, 80);
        assert_eq!(vp.content_offset_to_screen(0), ScreenOffset::new(0, 0));
        assert_eq!(vp.content_offset_to_screen(2), ScreenOffset::new(2, 0));
        assert_eq!(vp.content_offset_to_screen(3), ScreenOffset::new(0, 1));
        assert_eq!(vp.content_offset_to_screen(7), ScreenOffset::new(1, 2));

        vp.set_cursor(0, 2);
        assert_eq!(vp.scroll_offset().line, 2);
        // Scrolled above the window
        assert_eq!(vp.content_offset_to_screen(1), ScreenOffset::new(1, -2));
        assert!(!vp.content_offset_to_screen(1).is_within(1, 80));
    }

    #[test]
    fn test_offset_position_round_trip() {
        let vp = viewport("ab\ncd\n", 24, 80);
        assert_eq!(vp.position_of(4), Position::new(1, 1));
        assert_eq!(vp.position_of(6), Position::new(2, 0));
        assert_eq!(vp.position_of(2), Position::new(0, 2));
    }

    #[test]
    fn test_cursor_offset() {
        let mut vp = viewport("ab\ncd\n", 24, 80);
        vp.set_cursor(1, 1);
        assert_eq!(vp.cursor_offset(), 4);
    }

    #[test]
    fn test_visible_lines_clipped() {
        let mut vp = viewport("0123456789\nabcdefghij\nxy\nlast", 3, 4);
        vp.set_cursor(5, 1);
        assert_eq!(vp.scroll_offset(), Scroll { column: 2, line: 0 });

        let lines: Vec<(usize, &[u8])> = vp.visible_lines().collect();
        assert_eq!(lines, vec![(0, &b"2345"[..]), (1, &b"cdef"[..])]);
    }

    #[test]
    fn test_scrollbar_geometry() {
        let vp = viewport("a\nb", 24, 80);
        assert_eq!(vp.scrollbar(), None);

        let mut vp = viewport(&numbered_lines(99), 11, 80);
        let bar = vp.scrollbar().unwrap();
        assert_eq!(bar.track_len, 10);
        assert_eq!(bar.thumb_len, 1);
        assert_eq!(bar.thumb_start, 0);

        vp.scroll(0, 1000);
        let bar = vp.scrollbar().unwrap();
        assert_eq!(bar.thumb_start, 9);
        assert!(bar.is_thumb(9));
        assert!(!bar.is_thumb(0));
    }

    #[test]
    fn test_random_operations_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(42);

        let content: String = (0..60)
            .map(|i| format!("{}\n", "w".repeat(i * 7 % 130)))
            .collect();
        let mut vp = viewport(&content, 12, 40);

        for _ in 0..2000 {
            let dx = rng.gen_range(-60..=60);
            let dy = rng.gen_range(-20..=20);
            match rng.gen_range(0..4) {
                0 => vp.move_cursor(dx, dy),
                1 => vp.set_cursor(rng.gen_range(0..200), rng.gen_range(0..80)),
                2 => vp.resize(rng.gen_range(0..30), rng.gen_range(0..100)),
                _ => vp.scroll(dx, dy),
            }
            assert_invariants(&vp);
        }
    }
}
