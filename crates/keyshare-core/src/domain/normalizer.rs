//! KeyPressNormalizer: turns raw key-down/key-up signals into clean edges.
//!
//! Operating systems repeat key-down signals while a key is held ("auto-repeat").
//! A game controlled by a remote player must see exactly one press per
//! physical press, so the normalizer remembers, per key name, whether the key
//! is currently down and swallows repeated downs until the matching up.
//!
//! ```text
//! Down x   -> Pressed
//! Down x   -> Ignored   (auto-repeat)
//! Down x   -> Ignored
//! Up   x   -> Released
//! Up   x   -> Released  (idempotent)
//! ```
//!
//! The configured exit key short-circuits everything: its key-down always
//! yields [`Edge::Exit`], even while it is being auto-repeated.

use std::collections::HashMap;

use super::key_event::{KeyAction, KeyDirection, KeyEvent};

/// Result of feeding one raw [`KeyEvent`] to the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Auto-repeat of a key that is already down; nothing to do.
    Ignored,
    /// First key-down since the key was last released.
    Pressed,
    /// The key was released.
    Released,
    /// The exit key went down.  The caller stops reading input and begins shutdown.
    Exit,
}

impl Edge {
    /// Maps a press/release edge to its [`KeyAction`].
    pub fn action(self) -> Option<KeyAction> {
        match self {
            Edge::Pressed => Some(KeyAction::Press),
            Edge::Released => Some(KeyAction::Release),
            Edge::Ignored | Edge::Exit => None,
        }
    }
}

/// Edge detector with per-key pressed state.
///
/// One entry per key name ever seen; entries are never removed.
#[derive(Debug, Default)]
pub struct KeyPressNormalizer {
    exit_key: String,
    was_pressed: HashMap<String, bool>,
}

impl KeyPressNormalizer {
    /// Creates a normalizer that reports [`Edge::Exit`] for `exit_key`.
    pub fn new(exit_key: impl Into<String>) -> Self {
        Self {
            exit_key: exit_key.into(),
            was_pressed: HashMap::new(),
        }
    }

    /// Processes one raw key signal.
    pub fn process(&mut self, raw: &KeyEvent) -> Edge {
        match raw.direction {
            KeyDirection::Down => {
                if raw.name == self.exit_key {
                    return Edge::Exit;
                }
                let pressed = self.was_pressed.entry(raw.name.clone()).or_insert(false);
                if *pressed {
                    Edge::Ignored
                } else {
                    *pressed = true;
                    Edge::Pressed
                }
            }
            KeyDirection::Up => {
                self.was_pressed.insert(raw.name.clone(), false);
                Edge::Released
            }
        }
    }

    /// Returns `true` while `name` is between a delivered press and its release.
    pub fn is_pressed(&self, name: &str) -> bool {
        self.was_pressed.get(name).copied().unwrap_or(false)
    }

    /// Number of distinct key names seen so far.
    pub fn known_keys(&self) -> usize {
        self.was_pressed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_down_is_pressed() {
        // Arrange
        let mut n = KeyPressNormalizer::new("f8");

        // Act
        let edge = n.process(&KeyEvent::down("x"));

        // Assert
        assert_eq!(edge, Edge::Pressed);
        assert!(n.is_pressed("x"));
    }

    #[test]
    fn test_repeated_down_yields_single_press() {
        let mut n = KeyPressNormalizer::new("f8");

        let edges: Vec<Edge> = (0..5).map(|_| n.process(&KeyEvent::down("x"))).collect();

        assert_eq!(edges.iter().filter(|e| **e == Edge::Pressed).count(), 1);
        assert!(edges[1..].iter().all(|e| *e == Edge::Ignored));
    }

    #[test]
    fn test_up_without_prior_down_is_released() {
        // Arrange
        let mut n = KeyPressNormalizer::new("f8");

        // Act
        let edge = n.process(&KeyEvent::up("left"));

        // Assert
        assert_eq!(edge, Edge::Released);
        assert!(!n.is_pressed("left"));
        assert_eq!(n.known_keys(), 1);
    }

    #[test]
    fn test_up_is_idempotent() {
        let mut n = KeyPressNormalizer::new("f8");
        n.process(&KeyEvent::down("x"));

        assert_eq!(n.process(&KeyEvent::up("x")), Edge::Released);
        assert_eq!(n.process(&KeyEvent::up("x")), Edge::Released);
        assert!(!n.is_pressed("x"));
    }

    #[test]
    fn test_press_release_press_cycle() {
        let mut n = KeyPressNormalizer::new("f8");

        assert_eq!(n.process(&KeyEvent::down("x")), Edge::Pressed);
        assert_eq!(n.process(&KeyEvent::up("x")), Edge::Released);
        assert_eq!(n.process(&KeyEvent::down("x")), Edge::Pressed);
    }

    #[test]
    fn test_exit_key_down_precedes_repeat_suppression() {
        // Arrange
        let mut n = KeyPressNormalizer::new("f8");

        // Act / Assert – every down of the exit key reports Exit
        assert_eq!(n.process(&KeyEvent::down("f8")), Edge::Exit);
        assert_eq!(n.process(&KeyEvent::down("f8")), Edge::Exit);
        assert!(!n.is_pressed("f8"));
    }

    #[test]
    fn test_exit_key_up_is_plain_release() {
        let mut n = KeyPressNormalizer::new("f8");
        assert_eq!(n.process(&KeyEvent::up("f8")), Edge::Released);
    }

    #[test]
    fn test_keys_are_tracked_independently() {
        let mut n = KeyPressNormalizer::new("f8");

        assert_eq!(n.process(&KeyEvent::down("left")), Edge::Pressed);
        assert_eq!(n.process(&KeyEvent::down("right")), Edge::Pressed);
        assert_eq!(n.process(&KeyEvent::down("left")), Edge::Ignored);
        assert_eq!(n.process(&KeyEvent::up("right")), Edge::Released);
        assert!(n.is_pressed("left"));
        assert!(!n.is_pressed("right"));
    }

    #[test]
    fn test_edge_action_mapping() {
        assert_eq!(Edge::Pressed.action(), Some(KeyAction::Press));
        assert_eq!(Edge::Released.action(), Some(KeyAction::Release));
        assert_eq!(Edge::Ignored.action(), None);
        assert_eq!(Edge::Exit.action(), None);
    }
}
