//! Line-oriented key source.
//!
//! Reads one command per line:
//!
//! ```text
//! down x      key-down for "x"
//! up x        key-up for "x"
//! tap x       key-down then key-up for "x"
//! x           same as "tap x"
//! down left shift
//! ```
//!
//! Everything after the command word is the key name, so multi-word names
//! are accepted.
//!
//! Blank lines and lines starting with `#` are skipped.  Key names are
//! lower-cased to match the names produced by keyboard hooks.  End of input
//! closes the source.

use std::collections::VecDeque;
use std::io::BufRead;

use tracing::{error, warn};

use super::KeySource;
use crate::domain::key_event::KeyEvent;

/// Parses one line into zero, one or two key events.
///
/// Returns `None` for lines that are not a valid command.
pub fn parse_line(line: &str) -> Option<Vec<KeyEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Some(Vec::new());
    }

    let Some((first, rest)) = line.split_once(char::is_whitespace) else {
        let key = line.to_ascii_lowercase();
        return Some(vec![KeyEvent::down(key.clone()), KeyEvent::up(key)]);
    };

    // Multi-word names such as "left shift" keep single spaces between words
    let key = rest
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase();

    match first.to_ascii_lowercase().as_str() {
        "down" => Some(vec![KeyEvent::down(key)]),
        "up" => Some(vec![KeyEvent::up(key)]),
        "tap" => Some(vec![KeyEvent::down(key.clone()), KeyEvent::up(key)]),
        _ => None,
    }
}

/// [`KeySource`] over any buffered reader.
pub struct LineKeySource<R> {
    reader: R,
    pending: VecDeque<KeyEvent>,
}

impl<R: BufRead> LineKeySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead + Send> KeySource for LineKeySource<R> {
    fn read_next_key_event(&mut self) -> Option<KeyEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => match parse_line(&line) {
                    Some(events) => self.pending.extend(events),
                    None => warn!("ignoring unrecognised input line: {:?}", line.trim()),
                },
                Err(e) => {
                    error!("key source read error: {e}");
                    return None;
                }
            }
        }
    }
}
