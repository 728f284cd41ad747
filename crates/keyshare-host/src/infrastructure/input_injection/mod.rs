//! Key injectors: implementations of [`keyshare_core::KeyInjector`].
//!
//! - [`LoggingInjector`] – logs each key it would inject.  The default when no
//!   platform backend is compiled in, and handy for a dry run.
//! - [`mock::RecordingInjector`] – records calls for assertions in tests.
//! - `x11::X11Injector` – XTest injection on Linux, behind the `x11` feature.

use std::sync::Arc;

use keyshare_core::{InjectionError, KeyAction, KeyInjector};
use tracing::info;

pub mod mock;

#[cfg(all(feature = "x11", target_os = "linux"))]
pub mod x11;

/// Injector that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInjector;

impl KeyInjector for LoggingInjector {
    fn inject(&self, key: &str, action: KeyAction) -> Result<(), InjectionError> {
        info!("inject {action} {key}");
        Ok(())
    }
}

/// Returns the best injector available in this build.
///
/// With the `x11` feature on Linux this connects to the X display and falls
/// back to [`LoggingInjector`] if that fails.
pub fn platform_injector() -> Arc<dyn KeyInjector> {
    #[cfg(all(feature = "x11", target_os = "linux"))]
    {
        match x11::X11Injector::open() {
            Ok(injector) => return Arc::new(injector),
            Err(e) => tracing::error!("X11 injection unavailable, logging keys instead: {e}"),
        }
    }

    Arc::new(LoggingInjector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_injector_accepts_any_key() {
        let injector = LoggingInjector;

        assert!(injector.inject("s", KeyAction::Press).is_ok());
        assert!(injector.inject("no-such-key", KeyAction::Release).is_ok());
    }
}
