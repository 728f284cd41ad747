//! Mock key injector for unit and integration tests.
//!
//! Every call is pushed into a `Mutex<Vec<...>>` so assertions can inspect
//! exactly what was injected and in what order, even when the injector is
//! shared with a worker thread through an `Arc`.
//!
//! Construct with [`RecordingInjector::failing`] to exercise the error path.

use std::sync::{Mutex, PoisonError};

use keyshare_core::{InjectionError, KeyAction, KeyInjector};

/// Records `(key, action)` pairs instead of touching the OS.
#[derive(Debug, Default)]
pub struct RecordingInjector {
    /// Every successful call, oldest first.
    pub injected: Mutex<Vec<(String, KeyAction)>>,
    /// When `true`, every call fails with [`InjectionError::Platform`].
    pub should_fail: bool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of the recorded calls.
    pub fn recorded(&self) -> Vec<(String, KeyAction)> {
        self.injected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl KeyInjector for RecordingInjector {
    fn inject(&self, key: &str, action: KeyAction) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".to_string()));
        }
        self.injected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((key.to_string(), action));
        Ok(())
    }
}
