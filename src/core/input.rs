//! Key presses as seen by the session controller

use bitflags::bitflags;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// Keys the controller distinguishes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Up,
    Down,
    Left,
    Right,
    /// Anything else (function keys, Tab, Esc, ...)
    Other,
}

/// A single key press with its modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Key press without modifiers
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::empty())
    }

    /// Ctrl+C, in either case
    pub fn is_interrupt(&self) -> bool {
        self.mods.contains(Modifiers::CTRL)
            && matches!(self.key, Key::Char(c) if c.eq_ignore_ascii_case(&'c'))
    }

    /// Printable when no Ctrl, Alt or Meta is held (Shift is fine)
    pub fn printable_char(&self) -> Option<char> {
        let blocking = Modifiers::CTRL | Modifiers::ALT | Modifiers::META;
        match self.key {
            Key::Char(c) if !self.mods.intersects(blocking) && !c.is_control() => Some(c),
            _ => None,
        }
    }
}
