use crate::{GUTTER_WIDTH, MessageType, SCROLLBAR_WIDTH};
use quill_editor::{Editor, EditorInfo, Viewport};
use ratatui::{
    Frame,
    layout::{self, Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

const STATUS_BG: Color = Color::DarkGray;
const CURRENT_LINE_BG: Color = Color::Indexed(236);
const SCROLLBAR_TRACK: Color = Color::Indexed(236);
const SCROLLBAR_THUMB: Color = Color::Indexed(248);
/// Longest file name shown in the status line
const MAX_NAME_LEN: usize = 20;

/// Everything one frame is drawn from
pub(crate) struct View<'a> {
    pub editor: &'a Editor,
    pub message: Option<&'a (String, MessageType)>,
    pub welcome: bool,
}

pub(crate) fn draw(frame: &mut Frame, view: &View<'_>) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    if view.welcome {
        draw_welcome(frame, main_area, &view.editor.config().quit_key.to_string());
    } else {
        draw_text(frame, main_area, view.editor.viewport());
    }

    draw_status(frame, status_area, &view.editor.info(), view.message);
}

fn draw_text(frame: &mut Frame, area: Rect, viewport: &Viewport) {
    let [gutter_area, text_area, scrollbar_area] = Layout::horizontal([
        Constraint::Length(GUTTER_WIDTH as u16),
        Constraint::Min(1),
        Constraint::Length(SCROLLBAR_WIDTH as u16),
    ])
    .areas(area);

    let cursor_line = viewport.cursor().line;
    let mut numbers = Vec::new();
    let mut lines = Vec::new();

    for (n, text) in viewport.visible_lines() {
        let current = n == cursor_line;
        let number = format!("{:>width$} ", n + 1, width = GUTTER_WIDTH - 1);

        if current {
            numbers.push(Line::styled(number, Style::default().fg(Color::Yellow)));
            lines.push(Line::raw(display_text(text)).style(Style::default().bg(CURRENT_LINE_BG)));
        } else {
            numbers.push(Line::styled(number, Style::default().fg(Color::DarkGray)));
            lines.push(Line::raw(display_text(text)));
        }
    }

    frame.render_widget(Paragraph::new(numbers), gutter_area);
    frame.render_widget(Paragraph::new(lines), text_area);

    if let Some(bar) = viewport.scrollbar() {
        let cells: Vec<Line> = (0..bar.track_len)
            .map(|row| {
                let color = if bar.is_thumb(row) {
                    SCROLLBAR_THUMB
                } else {
                    SCROLLBAR_TRACK
                };
                Line::styled(" ", Style::default().bg(color))
            })
            .collect();
        frame.render_widget(Paragraph::new(cells), scrollbar_area);
    }

    let screen = viewport.content_offset_to_screen(viewport.cursor_offset());
    if screen.is_within(text_area.height as usize, text_area.width as usize) {
        frame.set_cursor_position(layout::Position::new(
            text_area.x + screen.x as u16,
            text_area.y + screen.y as u16,
        ));
    }
}

fn draw_welcome(frame: &mut Frame, area: Rect, quit_key: &str) {
    let row = area.height / 3;
    let banner = Rect::new(area.x, area.y + row, area.width, 1.min(area.height - row));
    let message = format!("Welcome to quill! {} to quit.", quit_key);

    frame.render_widget(
        Paragraph::new(message).alignment(Alignment::Center),
        banner,
    );
}

fn draw_status(
    frame: &mut Frame,
    area: Rect,
    info: &EditorInfo,
    message: Option<&(String, MessageType)>,
) {
    let style = Style::default()
        .bg(STATUS_BG)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    frame.render_widget(Paragraph::new(status_left(info)).style(style), left);

    let right_widget = match message {
        Some((msg, kind)) => {
            let bg = match kind {
                MessageType::Error => Color::Red,
                MessageType::Info => Color::Blue,
            };
            Paragraph::new(msg.as_str()).style(Style::default().bg(bg).fg(Color::White))
        }
        None => Paragraph::new(status_right(info))
            .alignment(Alignment::Right)
            .style(style),
    };
    frame.render_widget(right_widget, right);
}

fn status_left(info: &EditorInfo) -> String {
    let name: String = info
        .name
        .as_deref()
        .unwrap_or("[No Name]")
        .chars()
        .take(MAX_NAME_LEN)
        .collect();
    let modified = if info.modified { " [Modified]" } else { "" };
    format!(" {}{}", name, modified)
}

fn status_right(info: &EditorInfo) -> String {
    format!("Ln {}, Col {} ", info.cursor.line + 1, info.cursor.column + 1)
}

/// One cell per byte: printable ASCII as is, tabs as a space, anything else as a dot
fn display_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            b'\t' => ' ',
            0x20..=0x7e => b as char,
            _ => '·',
        })
        .collect()
}
