use crate::{
    buffer::{Buffer, BufferError},
    commands::{self, Direction},
    viewport::{Viewport, ViewportOptions},
};
use quill_core::location::Position;
use quill_input::{EditorKey, InputEvent, KeyCode, KeyModifiers, MouseEvent, MouseKind};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorInput {
    InsertChar(char),
    InsertString(String),
    InsertNewLine,

    DeleteChar,
    Backspace,

    Save,
    SaveAs(String),
    OpenFile(String),

    MoveUp(usize),
    MoveDown(usize),
    MoveLeft(usize),
    MoveRight(usize),

    LineStart,
    LineEnd,
    WordLeft,
    WordRight,
    PageUp,
    PageDown,
    DocumentStart,
    DocumentEnd,

    /// Mouse press or drag at a text-area cell
    Click { x: usize, y: usize },
    /// Scroll the window by whole lines, negative is up
    Scroll(isize),
    /// One mouse wheel notch
    Wheel(Direction),
    Resize { rows: usize, cols: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Request the frontend to shutdown
    Shutdown,
    /// Request the frontend to redraw
    Redraw,
    /// Display an error message to the user
    Error(String),
    /// Display an info message to the user
    Info(String),
}

/// Editor behaviour the user can tune
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub sticky_column: bool,
    pub wheel_lines: usize,
    pub tab_width: usize,
    pub quit_key: EditorKey,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            sticky_column: false,
            wheel_lines: commands::WHEEL_LINES,
            tab_width: 4,
            quit_key: EditorKey::with_modifiers(KeyCode::Char('q'), KeyModifiers::CONTROL),
        }
    }
}

/// One editing session: a buffer and the viewport onto it.
///
/// Every mutation of the buffer is followed by a viewport refresh before the
/// cursor is repositioned, so the viewport never works from a stale snapshot.
#[derive(Debug)]
pub struct Editor {
    buffer: Buffer,
    viewport: Viewport,
    config: EditorConfig,
}

impl Editor {
    /// Create an editor on an empty, unnamed buffer
    pub fn new(rows: usize, cols: usize, config: EditorConfig) -> Self {
        Self::with_buffer(Buffer::new(), rows, cols, config)
    }

    /// Create an editor with a file opened
    pub async fn with_file(
        path: impl AsRef<Path>,
        rows: usize,
        cols: usize,
        config: EditorConfig,
    ) -> Result<Self, BufferError> {
        let buffer = Buffer::from_file(path).await?;
        Ok(Self::with_buffer(buffer, rows, cols, config))
    }

    pub fn with_buffer(buffer: Buffer, rows: usize, cols: usize, config: EditorConfig) -> Self {
        let viewport = Viewport::attach_with(buffer.table(), rows, cols, viewport_options(&config));
        Self {
            buffer,
            viewport,
            config,
        }
    }

    /// Handle one input event and return what the frontend should do
    pub async fn process_event(&mut self, event: InputEvent) -> Vec<EditorEvent> {
        match event {
            InputEvent::Key(key) => self.process_key(key).await,
            InputEvent::Mouse(mouse) => match self.mouse_command(mouse) {
                Some(cmd) => self.execute_command(cmd).await,
                None => Vec::new(),
            },
            InputEvent::Resize { rows, cols } => {
                self.execute_command(EditorInput::Resize { rows, cols })
                    .await
            }
        }
    }

    /// Process a key input and return events for the frontend to handle
    pub async fn process_key(&mut self, key: EditorKey) -> Vec<EditorEvent> {
        let ctrl = key.modifiers.ctrl && !key.modifiers.alt && !key.modifiers.meta;

        if key.matches(&self.config.quit_key) || (ctrl && key.code == KeyCode::Char('c')) {
            return vec![EditorEvent::Shutdown];
        }

        let command = match (key.code, key.modifiers) {
            (KeyCode::Char('r'), _) if ctrl => return vec![EditorEvent::Redraw],
            (KeyCode::Char('s'), _) if ctrl => Some(EditorInput::Save),
            (KeyCode::Char('h'), _) if ctrl => Some(EditorInput::Backspace),

            (KeyCode::Up, m) if m.ctrl => Some(EditorInput::Scroll(-1)),
            (KeyCode::Down, m) if m.ctrl => Some(EditorInput::Scroll(1)),
            (KeyCode::Left, m) if m.ctrl => Some(EditorInput::WordLeft),
            (KeyCode::Right, m) if m.ctrl => Some(EditorInput::WordRight),
            (KeyCode::Home, m) if m.ctrl => Some(EditorInput::DocumentStart),
            (KeyCode::End, m) if m.ctrl => Some(EditorInput::DocumentEnd),

            (KeyCode::Left, _) => Some(EditorInput::MoveLeft(1)),
            (KeyCode::Right, _) => Some(EditorInput::MoveRight(1)),
            (KeyCode::Up, _) => Some(EditorInput::MoveUp(1)),
            (KeyCode::Down, _) => Some(EditorInput::MoveDown(1)),
            (KeyCode::Home, _) => Some(EditorInput::LineStart),
            (KeyCode::End, _) => Some(EditorInput::LineEnd),
            (KeyCode::PageUp, _) => Some(EditorInput::PageUp),
            (KeyCode::PageDown, _) => Some(EditorInput::PageDown),

            (KeyCode::Backspace, _) => Some(EditorInput::Backspace),
            (KeyCode::Delete, _) => Some(EditorInput::DeleteChar),
            (KeyCode::Enter, _) => Some(EditorInput::InsertNewLine),
            (KeyCode::Tab, _) => Some(EditorInput::InsertString(" ".repeat(self.config.tab_width))),

            (KeyCode::Char(c), _) if key.is_plain_char() => Some(EditorInput::InsertChar(c)),

            _ => None,
        };

        match command {
            Some(cmd) => self.execute_command(cmd).await,
            None => Vec::new(),
        }
    }

    fn mouse_command(&self, mouse: MouseEvent) -> Option<EditorInput> {
        match mouse.kind {
            MouseKind::Press | MouseKind::Drag => Some(EditorInput::Click {
                x: mouse.x,
                y: mouse.y,
            }),
            MouseKind::WheelUp => Some(EditorInput::Wheel(Direction::Backward)),
            MouseKind::WheelDown => Some(EditorInput::Wheel(Direction::Forward)),
            MouseKind::Release => None,
        }
    }

    pub async fn execute_command(&mut self, command: EditorInput) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        match command {
            EditorInput::OpenFile(path) => match Buffer::from_file(&path).await {
                Ok(buffer) => {
                    let (rows, cols) = self.viewport.size();
                    self.viewport = Viewport::attach_with(
                        buffer.table(),
                        rows,
                        cols,
                        viewport_options(&self.config),
                    );
                    self.buffer = buffer;
                    events.push(EditorEvent::Info(format!("Opened {}", path)));
                    events.push(EditorEvent::Redraw);
                }
                Err(e) => {
                    log::error!("Failed to open file {}: {:?}", path, e);
                    events.push(EditorEvent::Error(format!("Failed to open {}: {}", path, e)));
                }
            },
            EditorInput::Save => match self.buffer.save().await {
                Ok(()) => events.push(EditorEvent::Info("Saved".to_string())),
                Err(e) => {
                    log::error!("Failed to save buffer: {:?}", e);
                    events.push(EditorEvent::Error(format!("Save failed: {}", e)));
                }
            },
            EditorInput::SaveAs(path) => match self.buffer.save_as(&path).await {
                Ok(()) => events.push(EditorEvent::Info(format!("Saved as {}", path))),
                Err(e) => {
                    log::error!("Failed to save buffer as {}: {:?}", path, e);
                    events.push(EditorEvent::Error(format!("Save as {} failed: {}", path, e)));
                }
            },

            EditorInput::InsertChar(c) => {
                if c.is_ascii() && !c.is_ascii_control() {
                    self.insert_text(&[c as u8]);
                } else {
                    log::debug!("ignoring non-ASCII input {:?}", c);
                }
            }
            EditorInput::InsertString(s) => self.insert_text(s.as_bytes()),
            EditorInput::InsertNewLine => self.insert_text(b"\n"),
            EditorInput::Backspace => self.backspace(),
            EditorInput::DeleteChar => self.delete_forward(),

            EditorInput::MoveUp(count) => self.viewport.move_cursor(0, -signed(count)),
            EditorInput::MoveDown(count) => self.viewport.move_cursor(0, signed(count)),
            EditorInput::MoveLeft(count) => self.viewport.move_cursor(-signed(count), 0),
            EditorInput::MoveRight(count) => self.viewport.move_cursor(signed(count), 0),

            EditorInput::LineStart => commands::move_to_line_start(&mut self.viewport),
            EditorInput::LineEnd => commands::move_to_line_end(&mut self.viewport),
            EditorInput::WordLeft => commands::move_word(&mut self.viewport, Direction::Backward),
            EditorInput::WordRight => commands::move_word(&mut self.viewport, Direction::Forward),
            EditorInput::PageUp => commands::page_move(&mut self.viewport, Direction::Backward),
            EditorInput::PageDown => commands::page_move(&mut self.viewport, Direction::Forward),
            EditorInput::DocumentStart => commands::move_to_document_start(&mut self.viewport),
            EditorInput::DocumentEnd => commands::move_to_document_end(&mut self.viewport),

            EditorInput::Click { x, y } => {
                if !commands::click(&mut self.viewport, x, y) {
                    return events;
                }
            }
            EditorInput::Scroll(lines) => self.viewport.scroll(0, lines),
            EditorInput::Wheel(direction) => {
                commands::wheel(&mut self.viewport, direction, self.config.wheel_lines)
            }
            EditorInput::Resize { rows, cols } => self.viewport.resize(rows, cols),
        }

        events.push(EditorEvent::Redraw);
        events
    }

    /// Insert bytes at the cursor and leave the cursor after them
    fn insert_text(&mut self, text: &[u8]) {
        let offset = self.viewport.cursor_offset();
        self.buffer.table_mut().insert(offset, text);
        self.refresh_and_place_cursor(offset + text.len());
        log::debug!("inserted {} bytes at {}", text.len(), offset);
    }

    /// Delete the byte before the cursor, joining lines at column 0
    fn backspace(&mut self) {
        let offset = self.viewport.cursor_offset();
        if offset == 0 {
            return;
        }
        self.buffer.table_mut().delete(offset - 1, 1);
        self.refresh_and_place_cursor(offset - 1);
    }

    /// Delete the byte under the cursor, joining with the next line at end of line
    fn delete_forward(&mut self) {
        let offset = self.viewport.cursor_offset();
        if self.buffer.table_mut().delete(offset, 1) == 0 {
            return;
        }
        self.refresh_and_place_cursor(offset);
    }

    fn refresh_and_place_cursor(&mut self, offset: usize) {
        self.viewport.refresh(self.buffer.table());
        let Position { line, column } = self.viewport.position_of(offset);
        self.viewport.set_cursor(column, line);
    }

    pub fn info(&self) -> EditorInfo {
        EditorInfo {
            cursor: self.viewport.cursor(),
            filepath: self
                .buffer
                .filepath()
                .map(|p| p.to_string_lossy().into_owned()),
            name: self.buffer.name().map(|s| s.to_string()),
            modified: self.buffer.is_modified(),
            line_count: self.viewport.total_lines(),
            byte_count: self.buffer.table().len(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}

fn viewport_options(config: &EditorConfig) -> ViewportOptions {
    ViewportOptions {
        sticky_column: config.sticky_column,
    }
}

fn signed(count: usize) -> isize {
    isize::try_from(count).unwrap_or(isize::MAX)
}

/// Information about the current editor state, for the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorInfo {
    pub cursor: Position,
    pub filepath: Option<String>,
    pub name: Option<String>,
    pub modified: bool,
    pub line_count: usize,
    pub byte_count: usize,
}
