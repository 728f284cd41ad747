//! Key-name translation tables.
//!
//! Keys travel between machines as lowercase names (`x`, `left`, `f3`).  A
//! platform injector needs a native code instead; this module provides the
//! lookup for X11 KeySyms, which the host's XTest injector uses.
//!
//! X11 KeySym values are defined in X11/keysymdef.h.  Letters and digits use
//! their ASCII value (`XK_a` = 0x61); X11 applies Shift itself, so only the
//! lowercase form is listed.

/// Translates a key name to an X11 KeySym value.
///
/// Returns `None` if the name has no KeySym equivalent.
///
/// # Examples
///
/// ```rust
/// use keyshare_core::keymap::name_to_x11_keysym;
///
/// assert_eq!(name_to_x11_keysym("x"), Some(0x0078));
/// assert_eq!(name_to_x11_keysym("left"), Some(0xFF51));
/// assert_eq!(name_to_x11_keysym("no-such-key"), None);
/// ```
pub fn name_to_x11_keysym(name: &str) -> Option<u32> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return match c {
            'a'..='z' | '0'..='9' => Some(c as u32),
            ' ' => Some(0x0020),
            '-' => Some(0x002D), // XK_minus
            '=' => Some(0x003D), // XK_equal
            ',' => Some(0x002C), // XK_comma
            '.' => Some(0x002E), // XK_period
            '/' => Some(0x002F), // XK_slash
            ';' => Some(0x003B), // XK_semicolon
            _ => None,
        };
    }

    let keysym = match name {
        // Navigation
        "left" => 0xFF51,  // XK_Left
        "up" => 0xFF52,    // XK_Up
        "right" => 0xFF53, // XK_Right
        "down" => 0xFF54,  // XK_Down
        "home" => 0xFF50,
        "end" => 0xFF57,
        "page_up" => 0xFF55,
        "page_down" => 0xFF56,
        "insert" => 0xFF63,
        "delete" => 0xFFFF,

        // Editing
        "space" => 0x0020,
        "enter" | "return" => 0xFF0D,
        "esc" | "escape" => 0xFF1B,
        "tab" => 0xFF09,
        "backspace" => 0xFF08,

        // Modifiers map to the left-hand key
        "shift" | "left shift" => 0xFFE1,
        "right shift" => 0xFFE2,
        "ctrl" | "left ctrl" => 0xFFE3,
        "right ctrl" => 0xFFE4,
        "alt" | "left alt" => 0xFFE9,
        "right alt" => 0xFFEA,

        // Function keys (XK_F1 = 0xFFBE .. XK_F12 = 0xFFC9)
        "f1" => 0xFFBE,
        "f2" => 0xFFBF,
        "f3" => 0xFFC0,
        "f4" => 0xFFC1,
        "f5" => 0xFFC2,
        "f6" => 0xFFC3,
        "f7" => 0xFFC4,
        "f8" => 0xFFC5,
        "f9" => 0xFFC6,
        "f10" => 0xFFC7,
        "f11" => 0xFFC8,
        "f12" => 0xFFC9,

        _ => return None,
    };
    Some(keysym)
}
