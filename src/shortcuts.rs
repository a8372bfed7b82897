//! Keyboard shortcut mapping.
//!
//! | Keys | Command |
//! |---|---|
//! | Ctrl/Cmd + Z | Undo |
//! | Ctrl/Cmd + Y | Redo |
//! | Ctrl/Cmd + Shift + Z | Redo |
//! | Ctrl/Cmd + S | Export |
//! | Escape | Cancel crop (only while cropping) |
//!
//! Letters match case-insensitively, since browsers report `"Z"` when Shift
//! is held.

/// The key part of a key press, reduced to what the editor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        if key == "Escape" {
            return Key::Escape;
        }
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    pub fn with_shift(self) -> Self {
        Self {
            shift: true,
            ..self
        }
    }

    /// Ctrl or Cmd held.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

/// Editor actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Undo,
    Redo,
    Export,
    CancelCrop,
}

/// Resolve a key press to a command, if it is bound.
pub fn command_for(press: &KeyPress, cropping: bool) -> Option<EditorCommand> {
    match press.key {
        Key::Escape if cropping => Some(EditorCommand::CancelCrop),
        Key::Char(c) if press.modifiers.command() => {
            match (c.to_ascii_lowercase(), press.modifiers.shift) {
                ('z', false) => Some(EditorCommand::Undo),
                ('z', true) | ('y', _) => Some(EditorCommand::Redo),
                ('s', _) => Some(EditorCommand::Export),
                _ => None,
            }
        }
        _ => None,
    }
}
