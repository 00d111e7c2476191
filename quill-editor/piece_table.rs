use crate::viewport::ContentSource;

/// Which backing array a piece points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The content the table was created with, never mutated
    Original,
    /// The append-only log of inserted bytes
    Added,
}

/// A contiguous span of one backing array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub source: Source,
    pub start: usize,
    pub len: usize,
}

impl Piece {
    fn new(source: Source, start: usize, len: usize) -> Self {
        Self { source, start, len }
    }

    /// The first `len` bytes of this piece
    fn prefix(&self, len: usize) -> Self {
        Self::new(self.source, self.start, len)
    }

    /// Everything from `offset` to the end of this piece
    fn suffix(&self, offset: usize) -> Self {
        Self::new(self.source, self.start + offset, self.len - offset)
    }
}

/// Text storage as a sequence of pieces over two byte arrays.
///
/// Inserts append to `added` and splice a new piece in; nothing already
/// stored is ever copied or moved. Pieces hold offsets rather than
/// addresses, so `added` may reallocate freely.
///
/// Positions are byte offsets. Out-of-range positions are ignored rather
/// than reported, because every caller is an interactive edit that should
/// never fail.
#[derive(Debug, Clone, Default)]
pub struct PieceTable {
    original: Vec<u8>,
    added: Vec<u8>,
    pieces: Vec<Piece>,
    modified: bool,
}

impl PieceTable {
    /// Create a table whose whole content is `content`
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        let original = content.into();
        let pieces = if original.is_empty() {
            Vec::new()
        } else {
            vec![Piece::new(Source::Original, 0, original.len())]
        };

        Self {
            original,
            added: Vec::new(),
            pieces,
            modified: false,
        }
    }

    /// Insert `text` so that it starts at byte `pos`.
    ///
    /// Does nothing if `text` is empty or `pos` is past the end.
    pub fn insert(&mut self, pos: usize, text: &[u8]) {
        if text.is_empty() || pos > self.len() {
            return;
        }

        let new_piece = Piece::new(Source::Added, self.added.len(), text.len());
        self.added.extend_from_slice(text);

        match self.find_insert_point(pos) {
            None => self.pieces.push(new_piece),
            Some((index, offset)) => {
                let piece = self.pieces[index];
                if offset == 0 {
                    self.pieces.insert(index, new_piece);
                } else if offset == piece.len {
                    self.pieces.insert(index + 1, new_piece);
                } else {
                    let fragments = [piece.prefix(offset), new_piece, piece.suffix(offset)];
                    self.pieces.splice(index..=index, fragments);
                }
            }
        }

        log::trace!("inserted {} bytes at {}", text.len(), pos);
        self.modified = true;
    }

    /// Remove up to `len` bytes starting at `pos`, returning how many were removed.
    ///
    /// A range running past the end is truncated to the end of the content.
    pub fn delete(&mut self, pos: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }

        let Some((mut index, mut offset)) = self.find_delete_point(pos) else {
            return 0;
        };

        let mut remaining = len;
        while remaining > 0 && index < self.pieces.len() {
            let piece = self.pieces[index];
            let take = (piece.len - offset).min(remaining);

            if offset == 0 && take == piece.len {
                self.pieces.remove(index);
            } else if offset == 0 {
                self.pieces[index] = piece.suffix(take);
                index += 1;
            } else if offset + take == piece.len {
                self.pieces[index] = piece.prefix(offset);
                index += 1;
            } else {
                let fragments = [piece.prefix(offset), piece.suffix(offset + take)];
                self.pieces.splice(index..=index, fragments);
                index += 2;
            }

            remaining -= take;
            offset = 0;
        }

        let removed = len - remaining;
        if removed > 0 {
            log::trace!("deleted {} bytes at {}", removed, pos);
            self.modified = true;
        }
        removed
    }

    /// Materialize the current content into a fresh buffer
    pub fn content(&self) -> Vec<u8> {
        let mut content = Vec::with_capacity(self.len());
        for piece in &self.pieces {
            content.extend_from_slice(self.bytes(piece));
        }
        content
    }

    /// Current content length in bytes
    pub fn len(&self) -> usize {
        self.pieces.iter().map(|piece| piece.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    fn bytes(&self, piece: &Piece) -> &[u8] {
        let backing = match piece.source {
            Source::Original => &self.original,
            Source::Added => &self.added,
        };
        &backing[piece.start..piece.start + piece.len]
    }

    /// Piece index and local offset for an insert at `pos`.
    /// A position on a boundary between two pieces belongs to the earlier one.
    fn find_insert_point(&self, pos: usize) -> Option<(usize, usize)> {
        let mut piece_start = 0;
        for (index, piece) in self.pieces.iter().enumerate() {
            if pos <= piece_start + piece.len {
                return Some((index, pos - piece_start));
            }
            piece_start += piece.len;
        }
        None
    }

    /// Piece index and local offset of the byte at `pos`
    fn find_delete_point(&self, pos: usize) -> Option<(usize, usize)> {
        let mut piece_start = 0;
        for (index, piece) in self.pieces.iter().enumerate() {
            if pos < piece_start + piece.len {
                return Some((index, pos - piece_start));
            }
            piece_start += piece.len;
        }
        None
    }
}

impl ContentSource for PieceTable {
    fn read_content(&self) -> Vec<u8> {
        self.content()
    }
}
