//! HotkeyMatcher: recognizes a chorded key sequence such as `ctrl+c`.
//!
//! A hotkey is an ordered list of key names that must be pressed one after the
//! other, without the in-progress key being released and without any other
//! key being pressed in between.  The matcher keeps a cursor into the
//! sequence:
//!
//! ```text
//! sequence = [ctrl, c]
//!
//! Press ctrl   cursor 0 -> 1   Continue
//! Press c      cursor 1 -> 2   Complete (callback fires, cursor -> 0)
//!
//! Press ctrl   cursor 0 -> 1   Continue
//! Press x      cursor 1 -> 0   NoMatch  (sequence broken)
//! ```
//!
//! A broken sequence never restarts from the breaking key, even when that key
//! equals the first element; the next key must start the chord again.
//!
//! Several matchers are kept in a [`HotkeySet`] and evaluated in registration
//! order.  The order matters: the exit hotkey is registered first so it wins
//! over any later hotkey bound to the same physical key.

use std::fmt;

use super::key_event::KeyAction;

/// What a hotkey callback asks the caller to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Keep evaluating the remaining hotkeys and keep processing input.
    Continue,
    /// Stop evaluating further hotkeys for this key; the program is exiting.
    Stop,
}

/// Outcome of feeding one edge to a [`HotkeyMatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// The key did not advance the sequence.
    NoMatch,
    /// The key advanced the sequence but it is not complete yet.
    Continue,
    /// The sequence completed and the callback returned [`HotkeyAction::Continue`].
    Complete,
    /// The sequence completed and the callback returned [`HotkeyAction::Stop`].
    Abort,
}

type HotkeyCallback = Box<dyn FnMut() -> HotkeyAction + Send>;

/// Recognizer for a single key sequence.
pub struct HotkeyMatcher {
    sequence: Vec<String>,
    cursor: usize,
    callback: HotkeyCallback,
}

impl HotkeyMatcher {
    /// Creates a matcher for `sequence` that calls `callback` on completion.
    ///
    /// An empty sequence never matches.
    pub fn new<F>(sequence: Vec<String>, callback: F) -> Self
    where
        F: FnMut() -> HotkeyAction + Send + 'static,
    {
        Self {
            sequence,
            cursor: 0,
            callback: Box::new(callback),
        }
    }

    /// Creates a matcher from a `+`-separated description such as `"ctrl+c"`.
    pub fn parse<F>(combo: &str, callback: F) -> Self
    where
        F: FnMut() -> HotkeyAction + Send + 'static,
    {
        Self::new(parse_sequence(combo), callback)
    }

    /// Feeds one press or release edge for `name`.
    pub fn check(&mut self, name: &str, action: KeyAction) -> MatchResult {
        let Some(expected) = self.sequence.get(self.cursor) else {
            return MatchResult::NoMatch;
        };

        if name == expected.as_str() {
            match action {
                KeyAction::Release => {
                    self.cursor = 0;
                    MatchResult::NoMatch
                }
                KeyAction::Press => {
                    self.cursor += 1;
                    if self.cursor >= self.sequence.len() {
                        self.cursor = 0;
                        match (self.callback)() {
                            HotkeyAction::Continue => MatchResult::Complete,
                            HotkeyAction::Stop => MatchResult::Abort,
                        }
                    } else {
                        MatchResult::Continue
                    }
                }
            }
        } else {
            if action == KeyAction::Press {
                self.cursor = 0;
            }
            MatchResult::NoMatch
        }
    }

    /// Current position in the sequence.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The key names making up this hotkey.
    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }
}

impl fmt::Debug for HotkeyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyMatcher")
            .field("sequence", &self.sequence)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// Splits `"ctrl+c"` into `["ctrl", "c"]`, trimming whitespace and dropping
/// empty parts.
pub fn parse_sequence(combo: &str) -> Vec<String> {
    combo
        .split('+')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered collection of hotkeys evaluated for every edge.
#[derive(Debug, Default)]
pub struct HotkeySet {
    matchers: Vec<HotkeyMatcher>,
}

impl HotkeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a hotkey; it is evaluated after every previously registered one.
    pub fn register(&mut self, matcher: HotkeyMatcher) {
        self.matchers.push(matcher);
    }

    /// Feeds an edge to every hotkey in registration order.
    ///
    /// Returns `true` when a callback asked to stop; later hotkeys are not
    /// evaluated for this edge.
    pub fn dispatch(&mut self, name: &str, action: KeyAction) -> bool {
        for matcher in &mut self.matchers {
            if matcher.check(name, action) == MatchResult::Abort {
                return true;
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
