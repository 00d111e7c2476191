use crate::ScreenLayout;
use quill_input::{
    EditorKey, InputEvent, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseKind,
};
use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};

/// Translate a terminal event into an editor input event.
///
/// Mouse coordinates come out relative to the text area; presses in the
/// gutter, the scrollbar or the status line yield `None`.
pub fn decode_event(event: Event, layout: &ScreenLayout) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            key_event_to_editor_key(key).map(InputEvent::Key)
        }
        Event::Mouse(mouse) => decode_mouse(mouse, layout).map(InputEvent::Mouse),
        Event::Resize(width, height) => {
            let (rows, cols) = ScreenLayout::new(width, height).viewport_size();
            Some(InputEvent::Resize { rows, cols })
        }
        _ => None,
    }
}

/// Convert a crossterm KeyEvent into our platform-independent EditorKey
fn key_event_to_editor_key(key: KeyEvent) -> Option<EditorKey> {
    let code = match key.code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Tab => KeyCode::Tab,
        event::KeyCode::Delete => KeyCode::Delete,
        event::KeyCode::Esc => KeyCode::Escape,
        event::KeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };

    let modifiers = KeyModifiers {
        ctrl: key.modifiers.contains(event::KeyModifiers::CONTROL),
        alt: key.modifiers.contains(event::KeyModifiers::ALT),
        shift: key.modifiers.contains(event::KeyModifiers::SHIFT),
        meta: key.modifiers.contains(event::KeyModifiers::SUPER),
    };

    Some(EditorKey::with_modifiers(code, modifiers))
}

fn decode_mouse(mouse: event::MouseEvent, layout: &ScreenLayout) -> Option<MouseEvent> {
    let (kind, button) = match mouse.kind {
        MouseEventKind::Down(button) => (MouseKind::Press, convert_button(button)),
        MouseEventKind::Drag(button) => (MouseKind::Drag, convert_button(button)),
        MouseEventKind::Up(button) => (MouseKind::Release, convert_button(button)),
        // The wheel scrolls wherever the pointer is
        MouseEventKind::ScrollUp => {
            return Some(MouseEvent::new(MouseKind::WheelUp, 0, 0, MouseButton::None));
        }
        MouseEventKind::ScrollDown => {
            return Some(MouseEvent::new(MouseKind::WheelDown, 0, 0, MouseButton::None));
        }
        _ => return None,
    };

    let (x, y) = layout.text_cell(mouse.column, mouse.row)?;
    Some(MouseEvent::new(kind, x, y, button))
}

fn convert_button(button: event::MouseButton) -> MouseButton {
    match button {
        event::MouseButton::Left => MouseButton::Left,
        event::MouseButton::Middle => MouseButton::Middle,
        event::MouseButton::Right => MouseButton::Right,
    }
}
