mod decode;
mod render;

pub use decode::decode_event;

use anyhow::{Context, Result};
use quill_editor::{Editor, EditorEvent};
use quill_input::InputEvent;
use ratatui::{
    DefaultTerminal,
    crossterm::{
        event::{self, DisableMouseCapture, EnableMouseCapture, Event},
        execute,
    },
};
use tokio::sync::mpsc;

/// Line number column: four digits and a space
pub const GUTTER_WIDTH: usize = 5;
pub const SCROLLBAR_WIDTH: usize = 1;

/// How the screen splits into gutter, text area, scrollbar and status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    width: u16,
    height: u16,
}

impl ScreenLayout {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Size to give the viewport. Its rows include the status line.
    pub fn viewport_size(&self) -> (usize, usize) {
        (self.height as usize, self.text_cols())
    }

    pub fn text_rows(&self) -> usize {
        (self.height as usize).saturating_sub(1)
    }

    pub fn text_cols(&self) -> usize {
        (self.width as usize).saturating_sub(GUTTER_WIDTH + SCROLLBAR_WIDTH)
    }

    /// Text-area cell under a screen cell, if there is one
    pub fn text_cell(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        let (column, row) = (column as usize, row as usize);
        if column < GUTTER_WIDTH || row >= self.text_rows() {
            return None;
        }

        let x = column - GUTTER_WIDTH;
        (x < self.text_cols()).then_some((x, row))
    }
}

/// Owns the terminal while the editor runs.
///
/// Acquiring enters raw mode, the alternate screen and mouse capture;
/// dropping leaves all three, whether `run` returns normally, fails or
/// unwinds from a panic.
pub struct TerminalGuard {
    terminal: DefaultTerminal,
}

impl TerminalGuard {
    pub fn acquire() -> Result<Self> {
        let terminal = ratatui::try_init().context("Failed to initialize terminal")?;

        if let Err(e) = execute!(std::io::stdout(), EnableMouseCapture) {
            ratatui::restore();
            return Err(e).context("Failed to enable mouse capture");
        }

        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut DefaultTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(std::io::stdout(), DisableMouseCapture) {
            log::warn!("Failed to disable mouse capture: {}", e);
        }
        ratatui::restore();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Idle,
    Redraw,
    Shutdown,
}

#[derive(Debug)]
pub struct Terminal {
    editor: Editor,
    layout: ScreenLayout,
    message: Option<(String, MessageType)>,
    /// Show the welcome banner until the buffer gets content or a file
    welcome: bool,
}

impl Terminal {
    pub fn new(editor: Editor, welcome: bool) -> Self {
        let (rows, cols) = editor.viewport().size();
        let width = cols + GUTTER_WIDTH + SCROLLBAR_WIDTH;

        Self {
            editor,
            layout: ScreenLayout::new(
                u16::try_from(width).unwrap_or(u16::MAX),
                u16::try_from(rows).unwrap_or(u16::MAX),
            ),
            message: None,
            welcome,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut guard = TerminalGuard::acquire()?;

        let size = guard.terminal_mut().size()?;
        self.handle_event(Event::Resize(size.width, size.height))
            .await;

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        // Poll with a timeout so the reader notices when the channel closes
        let event_task = tokio::task::spawn_blocking(move || -> Result<()> {
            loop {
                if event::poll(std::time::Duration::from_millis(250))? {
                    match event::read() {
                        Ok(event) => {
                            if event_tx.send(event).is_err() {
                                log::info!("Event channel closed, stopping event reader");
                                break;
                            }
                        }
                        Err(e) => {
                            log::error!("Failed to read event: {}", e);
                            return Err(e.into());
                        }
                    }
                } else if event_tx.is_closed() {
                    log::info!("Event channel closed, stopping event reader");
                    break;
                }
            }
            Ok(())
        });

        guard.terminal_mut().draw(|frame| self.draw(frame))?;

        while let Some(event) = event_rx.recv().await {
            match self.handle_event(event).await {
                Flow::Shutdown => break,
                Flow::Redraw => {
                    guard.terminal_mut().draw(|frame| self.draw(frame))?;
                }
                Flow::Idle => {}
            }
        }

        drop(guard);
        drop(event_rx);

        // With polling at 250ms intervals the reader exits well within this
        match tokio::time::timeout(std::time::Duration::from_millis(500), event_task).await {
            Ok(Ok(Ok(()))) => log::debug!("Event task exited cleanly"),
            Ok(Ok(Err(e))) => log::warn!("Event task exited with error: {:?}", e),
            Ok(Err(e)) => log::warn!("Event task panicked: {:?}", e),
            Err(_) => log::warn!("Event task did not exit within timeout"),
        }

        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        let buffer = self.editor.buffer();
        let view = render::View {
            editor: &self.editor,
            message: self.message.as_ref(),
            welcome: self.welcome
                && buffer.filepath().is_none()
                && buffer.table().is_empty()
                && !buffer.is_modified(),
        };
        render::draw(frame, &view);
    }

    async fn handle_event(&mut self, event: Event) -> Flow {
        if let Event::Resize(width, height) = event {
            self.layout = ScreenLayout::new(width, height);
        }

        let Some(input) = decode_event(event, &self.layout) else {
            return Flow::Idle;
        };

        // A message stays up until the next key press
        if matches!(input, InputEvent::Key(_)) {
            self.message = None;
        }

        let events = self.editor.process_event(input).await;
        self.apply_events(events)
    }

    fn apply_events(&mut self, events: Vec<EditorEvent>) -> Flow {
        let mut flow = Flow::Idle;

        for editor_event in events {
            match editor_event {
                EditorEvent::Shutdown => return Flow::Shutdown,
                EditorEvent::Redraw => flow = Flow::Redraw,
                EditorEvent::Error(msg) => {
                    self.message = Some((msg, MessageType::Error));
                    flow = Flow::Redraw;
                }
                EditorEvent::Info(msg) => {
                    self.message = Some((msg, MessageType::Info));
                    flow = Flow::Redraw;
                }
            }
        }

        flow
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }
}
