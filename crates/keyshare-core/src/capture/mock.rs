//! Scripted key source for tests.
//!
//! Replays a fixed list of [`KeyEvent`]s and then reports the source as
//! closed, which makes the input loop shut down on its own.

use std::collections::VecDeque;

use super::KeySource;
use crate::domain::key_event::KeyEvent;

/// A [`KeySource`] that replays a predefined script.
#[derive(Debug, Default)]
pub struct ScriptedKeySource {
    events: VecDeque<KeyEvent>,
}

impl ScriptedKeySource {
    pub fn new(events: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Convenience: one key-down followed by one key-up per name.
    pub fn taps<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(
            names
                .into_iter()
                .flat_map(|n| [KeyEvent::down(n), KeyEvent::up(n)]),
        )
    }

    /// Number of events not yet read.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl KeySource for ScriptedKeySource {
    fn read_next_key_event(&mut self) -> Option<KeyEvent> {
        self.events.pop_front()
    }
}
