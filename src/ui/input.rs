//! Terminal key mapping

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Key;

/// Translate a crossterm key press into a game key
pub fn map_key(key: KeyEvent) -> Option<Key> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
        return Some(Key::Interrupt);
    }
    Some(match key.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_c_interrupts() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Key::Interrupt));
        let plain = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(map_key(plain), Some(Key::Char('c')));
    }

    #[test]
    fn test_arrows_and_unmapped() {
        assert_eq!(map_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)), Some(Key::Left));
        assert_eq!(map_key(KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE)), None);
    }
}
