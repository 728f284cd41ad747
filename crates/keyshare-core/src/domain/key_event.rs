//! Raw key signals and the actions derived from them.
//!
//! Key names are opaque strings produced by the capture capability (`"x"`,
//! `"left"`, `"f8"`, ...).  The core never interprets them beyond equality.

use std::fmt;

/// Direction of a raw key signal as reported by the capture capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDirection {
    /// The key went (or is still held) down.  OS auto-repeat produces a stream
    /// of these without intervening [`KeyDirection::Up`] signals.
    Down,
    /// The key was released.
    Up,
}

/// A raw key signal produced by the capture capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key name as reported by the capture library.
    pub name: String,
    /// Whether the key went down or up.
    pub direction: KeyDirection,
}

impl KeyEvent {
    /// Creates a key-down signal for `name`.
    pub fn down(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: KeyDirection::Down,
        }
    }

    /// Creates a key-up signal for `name`.
    pub fn up(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: KeyDirection::Up,
        }
    }
}

/// An edge-triggered key action: what is forwarded over the wire and injected
/// on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    Release,
}

impl KeyAction {
    /// Returns `true` for [`KeyAction::Press`].
    pub fn is_press(self) -> bool {
        matches!(self, KeyAction::Press)
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAction::Press => f.write_str("press"),
            KeyAction::Release => f.write_str("release"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_constructors_set_direction() {
        assert_eq!(KeyEvent::down("x").direction, KeyDirection::Down);
        assert_eq!(KeyEvent::up("x").direction, KeyDirection::Up);
        assert_eq!(KeyEvent::up("left").name, "left");
    }

    #[test]
    fn test_key_action_is_press() {
        assert!(KeyAction::Press.is_press());
        assert!(!KeyAction::Release.is_press());
    }

    #[test]
    fn test_key_action_display() {
        assert_eq!(KeyAction::Press.to_string(), "press");
        assert_eq!(KeyAction::Release.to_string(), "release");
    }
}
