//! Input events as the editor sees them.
//! The terminal frontend decodes its own event type into these, so nothing in
//! the editor depends on a particular terminal library.

use std::{fmt, str::FromStr};
use thiserror::Error;

/// Key codes - what key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Backspace,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Delete,
    Escape,
    F(u8), // F1-F12
}

/// A key press together with its modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorKey {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool, // Command on Mac, Super/Windows key elsewhere
}

impl KeyModifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CONTROL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const ALT: Self = Self {
        ctrl: false,
        alt: true,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.meta
    }
}

impl EditorKey {
    /// Create a key with no modifiers
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Check if this is a plain character (no control modifiers)
    pub fn is_plain_char(&self) -> bool {
        matches!(self.code, KeyCode::Char(_))
            && !self.modifiers.ctrl
            && !self.modifiers.alt
            && !self.modifiers.meta
    }

    /// Whether `other` names the same key, ignoring shift.
    ///
    /// Terminals report shift inconsistently for control chords, so bindings
    /// such as the quit key compare without it.
    pub fn matches(&self, other: &EditorKey) -> bool {
        self.code == other.code
            && self.modifiers.ctrl == other.modifiers.ctrl
            && self.modifiers.alt == other.modifiers.alt
            && self.modifiers.meta == other.modifiers.meta
    }
}

/// What happened to the mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Press,
    Drag,
    Release,
    WheelUp,
    WheelDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Wheel events and releases reported without a button
    None,
}

/// A mouse event in text-area coordinates (gutter already subtracted)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub x: usize,
    pub y: usize,
    pub button: MouseButton,
}

impl MouseEvent {
    pub fn new(kind: MouseKind, x: usize, y: usize, button: MouseButton) -> Self {
        Self { kind, x, y, button }
    }
}

/// One discrete event delivered to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(EditorKey),
    Mouse(MouseEvent),
    /// The display area changed size; `rows` includes the status line
    Resize { rows: usize, cols: usize },
}

impl From<EditorKey> for InputEvent {
    fn from(key: EditorKey) -> Self {
        InputEvent::Key(key)
    }
}

impl From<MouseEvent> for InputEvent {
    fn from(mouse: MouseEvent) -> Self {
        InputEvent::Mouse(mouse)
    }
}

/// Error type for parsing key specifications
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseKeyError {
    #[error("empty key specification")]
    Empty,
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),
    #[error("unknown key: {0}")]
    UnknownKey(String),
    #[error("invalid function key: {0}")]
    InvalidFunctionKey(String),
}

impl FromStr for EditorKey {
    type Err = ParseKeyError;

    /// Parse a key specification string into an EditorKey.
    ///
    /// Supports both long-form and Emacs-style modifiers:
    /// - Control: "Ctrl-" or "C-"
    /// - Alt/Meta: "Alt-" or "M-"
    /// - Shift: "Shift-" or "S-"
    /// - Super: "Super-" or "s-"
    ///
    /// Examples: "C-q", "Ctrl-x", "C-M-s", "Shift-Left", "F1".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseKeyError::Empty);
        }

        // A trailing "-" is the minus key itself, e.g. "C--"
        let (prefix, key_part) = match s.strip_suffix("--") {
            Some(rest) => (Some(rest), "-"),
            None => match s.rsplit_once('-') {
                Some((rest, key)) => (Some(rest), key),
                None => (None, s),
            },
        };

        let mut modifiers = KeyModifiers::default();
        if let Some(prefix) = prefix {
            for part in prefix.split('-') {
                match part {
                    "Ctrl" | "C" => modifiers.ctrl = true,
                    "Alt" | "M" => modifiers.alt = true,
                    "Shift" | "S" => modifiers.shift = true,
                    "Super" | "s" => modifiers.meta = true,
                    _ => return Err(ParseKeyError::UnknownModifier(part.to_string())),
                }
            }
        }

        let code = parse_key_code(key_part)?;

        Ok(EditorKey { code, modifiers })
    }
}

impl fmt::Display for EditorKey {
    /// Emacs-style spelling that parses back to the same key, e.g. "C-q"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (on, prefix) in [(m.ctrl, "C-"), (m.alt, "M-"), (m.shift, "S-"), (m.meta, "s-")] {
            if on {
                f.write_str(prefix)?;
            }
        }

        match self.code {
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Left => f.write_str("Left"),
            KeyCode::Right => f.write_str("Right"),
            KeyCode::Up => f.write_str("Up"),
            KeyCode::Down => f.write_str("Down"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::PageUp => f.write_str("PageUp"),
            KeyCode::PageDown => f.write_str("PageDown"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Delete => f.write_str("Delete"),
            KeyCode::Escape => f.write_str("Escape"),
        }
    }
}

fn parse_key_code(s: &str) -> Result<KeyCode, ParseKeyError> {
    match s {
        "" => Err(ParseKeyError::Empty),

        "Enter" => Ok(KeyCode::Enter),
        "Backspace" => Ok(KeyCode::Backspace),
        "Delete" => Ok(KeyCode::Delete),
        "Escape" | "Esc" => Ok(KeyCode::Escape),
        "Tab" => Ok(KeyCode::Tab),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),

        // F1-F12
        s if s.starts_with('F') && s.len() > 1 && s[1..].chars().all(|c| c.is_ascii_digit()) => {
            let num: u8 = s[1..]
                .parse()
                .map_err(|_| ParseKeyError::InvalidFunctionKey(s.to_string()))?;
            if (1..=12).contains(&num) {
                Ok(KeyCode::F(num))
            } else {
                Err(ParseKeyError::InvalidFunctionKey(s.to_string()))
            }
        }

        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(ParseKeyError::UnknownKey(s.to_string())),
            }
        }
    }
}
