//! The two OS-facing capabilities the core depends on.
//!
//! Observing keys system-wide and synthesizing key presses are platform
//! services that live outside this crate.  The core only sees them through
//! two traits:
//!
//! - [`KeySource`] – blocking read of the next raw key signal.
//! - [`KeyInjector`] – press or release a key on this machine.
//!
//! # Testability
//!
//! [`mock::ScriptedKeySource`] replays a fixed list of events, and
//! [`line_source::LineKeySource`] reads `down x` / `up x` lines from any
//! reader (stdin in the binaries, a byte slice in tests).

use thiserror::Error;

use crate::domain::key_event::{KeyAction, KeyEvent};

pub mod line_source;
pub mod mock;

/// Error type for key injection.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The key name has no equivalent on this platform.
    #[error("unknown key name: {0}")]
    UnknownKey(String),
    /// The platform API refused the event.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Blocking source of raw key signals.
pub trait KeySource: Send {
    /// Waits for the next key signal.
    ///
    /// Returns `None` once the source is exhausted or closed; the input loop
    /// treats that as an exit request.
    fn read_next_key_event(&mut self) -> Option<KeyEvent>;
}

/// Synthesizes key presses and releases on the local machine.
pub trait KeyInjector: Send + Sync {
    /// Presses or releases `key`.
    fn inject(&self, key: &str, action: KeyAction) -> Result<(), InjectionError>;
}
