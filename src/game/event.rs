//! Input events
//!
//! The core's own event type: a key press or the periodic tick. Front-ends
//! translate their native events into these.

/// A key the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Backspace,
    /// Ctrl-C
    Interrupt,
    Char(char),
}

impl Key {
    /// Movement vector for arrow keys
    pub fn direction(&self) -> Option<(i32, i32)> {
        match self {
            Key::Up => Some((0, -1)),
            Key::Down => Some((0, 1)),
            Key::Left => Some((-1, 0)),
            Key::Right => Some((1, 0)),
            _ => None,
        }
    }

    /// Keys worth replaying after an animation finishes
    pub fn is_action(&self) -> bool {
        self.direction().is_some() || matches!(self, Key::Char(_))
    }
}

/// Everything that drives the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One unit of simulated time
    Tick,
    Key(Key),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions() {
        assert_eq!(Key::Up.direction(), Some((0, -1)));
        assert_eq!(Key::Right.direction(), Some((1, 0)));
        assert_eq!(Key::Enter.direction(), None);
    }

    #[test]
    fn test_action_keys() {
        assert!(Key::Left.is_action());
        assert!(Key::Char('f').is_action());
        assert!(!Key::Escape.is_action());
        assert!(!Key::Interrupt.is_action());
    }
}
