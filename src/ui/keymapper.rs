//! Key mapping for terminal input
//!
//! Converts crossterm key events into the controller's [`KeyPress`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::input::{Key, KeyPress, Modifiers};

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        if mods.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
            result |= Modifiers::META;
        }
        result
    }
}

/// Key mapper for converting key events to key presses
pub struct KeyMapper;

impl KeyMapper {
    /// Map a crossterm KeyEvent to a controller key press
    pub fn map(event: &KeyEvent) -> KeyPress {
        let key = match event.code {
            KeyCode::Char(ch) => Key::Char(ch),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            _ => Key::Other,
        };
        KeyPress::new(key, Modifiers::from(event.modifiers))
    }

    /// Host-level quit chord (Ctrl+D or Ctrl+Q)
    pub fn is_quit(event: &KeyEvent) -> bool {
        event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(
                event.code,
                KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('q') | KeyCode::Char('Q')
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_char_keys() {
        let event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), KeyPress::plain(Key::Char('a')));

        let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(KeyMapper::map(&event).is_interrupt());

        let event = key_event(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(
            KeyMapper::map(&event),
            KeyPress::new(Key::Char('x'), Modifiers::ALT)
        );

        let event = key_event(KeyCode::Char('v'), KeyModifiers::SUPER);
        assert_eq!(KeyMapper::map(&event).printable_char(), None);
    }

    #[test]
    fn test_editing_and_arrow_keys() {
        let event = key_event(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event).key, Key::Enter);

        let event = key_event(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event).key, Key::Backspace);

        let event = key_event(KeyCode::Up, KeyModifiers::CONTROL);
        assert_eq!(
            KeyMapper::map(&event),
            KeyPress::new(Key::Up, Modifiers::CTRL)
        );

        let event = key_event(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event).key, Key::Other);
    }

    #[test]
    fn test_quit_chord() {
        assert!(KeyMapper::is_quit(&key_event(KeyCode::Char('d'), KeyModifiers::CONTROL)));
        assert!(KeyMapper::is_quit(&key_event(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(!KeyMapper::is_quit(&key_event(KeyCode::Char('d'), KeyModifiers::NONE)));
        assert!(!KeyMapper::is_quit(&key_event(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }
}
