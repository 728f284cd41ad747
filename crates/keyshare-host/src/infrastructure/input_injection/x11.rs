//! Linux X11 key injection via the XTest extension.
//!
//! A key name is translated in two steps:
//!
//! ```text
//! key name → X11 KeySym (keyshare_core::keymap) → XKeysymToKeycode → keycode
//! ```
//!
//! `XTestFakeKeyEvent` then synthesizes the press or release on the focused
//! window, and `XFlush` sends it to the server immediately.
//!
//! The process must be able to open the display named by `DISPLAY`.

use std::ptr;
use std::sync::{Mutex, PoisonError};

use keyshare_core::keymap::name_to_x11_keysym;
use keyshare_core::{InjectionError, KeyAction, KeyInjector};
use x11::{xlib, xtest};

/// `CurrentTime`: let the server timestamp the synthesized event.
const CURRENT_TIME: xlib::Time = 0;

struct Display(*mut xlib::Display);

// SAFETY: the pointer is only used while holding the surrounding mutex, so
// Xlib never sees concurrent calls on this connection.
unsafe impl Send for Display {}

/// XTest injector holding one display connection.
pub struct X11Injector {
    display: Mutex<Display>,
}

impl X11Injector {
    /// Connects to the X display.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Platform`] if the display cannot be opened.
    pub fn open() -> Result<Self, InjectionError> {
        // SAFETY: a null name selects the display from `DISPLAY`.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(InjectionError::Platform("cannot open X display".to_string()));
        }
        Ok(Self {
            display: Mutex::new(Display(display)),
        })
    }
}

impl KeyInjector for X11Injector {
    fn inject(&self, key: &str, action: KeyAction) -> Result<(), InjectionError> {
        let keysym = name_to_x11_keysym(key).ok_or_else(|| InjectionError::UnknownKey(key.to_string()))?;
        let guard = self.display.lock().unwrap_or_else(PoisonError::into_inner);
        let display = guard.0;

        // SAFETY: `display` is a live connection opened in `open` and guarded
        // by the mutex for the duration of these calls.
        unsafe {
            let keycode = xlib::XKeysymToKeycode(display, xlib::KeySym::from(keysym));
            if keycode == 0 {
                return Err(InjectionError::UnknownKey(key.to_string()));
            }
            let is_press = i32::from(action.is_press());
            if xtest::XTestFakeKeyEvent(display, u32::from(keycode), is_press, CURRENT_TIME) == 0 {
                return Err(InjectionError::Platform(format!("XTestFakeKeyEvent rejected {key}")));
            }
            xlib::XFlush(display);
        }
        Ok(())
    }
}

impl Drop for X11Injector {
    fn drop(&mut self) {
        let guard = self.display.get_mut().unwrap_or_else(PoisonError::into_inner);
        // SAFETY: the connection is closed exactly once, here.
        unsafe {
            xlib::XCloseDisplay(guard.0);
        }
    }
}
