//! Textual codec for Keyshare datagrams.
//!
//! Wire format (one UDP datagram per event):
//! ```text
//! TYPE|PAYLOAD
//! ```
//! `TYPE` is one of `key_press`, `key_release`, `disconnect`; `PAYLOAD` is the
//! raw key name (empty for `disconnect`).  The datagram is UTF-8 with no
//! length prefix, checksum, sequence number or acknowledgement.
//!
//! Only the first `|` separates type from payload, so a key literally named
//! `|` survives the trip.  A datagram without any `|` is read as a bare
//! `TYPE` with an empty payload.
//!
//! Decoding parses straight into [`WireMessage`]; unknown types are kept as
//! [`WireMessage::Unknown`] rather than rejected so the host can log them.

use std::fmt;

use thiserror::Error;

use crate::domain::key_event::KeyAction;

/// Separator between the message type and its payload.
pub const SEPARATOR: char = '|';

/// Largest datagram the host reads; longer datagrams are truncated by the OS.
pub const MAX_DATAGRAM_SIZE: usize = 2048;

pub const KEY_PRESS: &str = "key_press";
pub const KEY_RELEASE: &str = "key_release";
pub const DISCONNECT: &str = "disconnect";

/// Errors that can occur while decoding a datagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The datagram is not valid UTF-8.
    #[error("datagram is not valid UTF-8 ({len} bytes)")]
    InvalidUtf8 { len: usize },
}

/// A decoded Keyshare datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
    /// A tracked key went down on the client.
    KeyPress(String),
    /// A tracked key was released on the client.
    KeyRelease(String),
    /// The client is leaving; the host frees its player slot.
    Disconnect,
    /// Any other type token, kept verbatim for diagnostics.
    Unknown { kind: String, payload: String },
}

impl WireMessage {
    /// Builds a key message for `action`.
    pub fn key(name: impl Into<String>, action: KeyAction) -> Self {
        match action {
            KeyAction::Press => WireMessage::KeyPress(name.into()),
            KeyAction::Release => WireMessage::KeyRelease(name.into()),
        }
    }

    /// The `TYPE` token this message is sent with.
    pub fn kind(&self) -> &str {
        match self {
            WireMessage::KeyPress(_) => KEY_PRESS,
            WireMessage::KeyRelease(_) => KEY_RELEASE,
            WireMessage::Disconnect => DISCONNECT,
            WireMessage::Unknown { kind, .. } => kind.as_str(),
        }
    }

    /// The `PAYLOAD` this message is sent with.
    pub fn payload(&self) -> &str {
        match self {
            WireMessage::KeyPress(name) | WireMessage::KeyRelease(name) => name.as_str(),
            WireMessage::Disconnect => "",
            WireMessage::Unknown { payload, .. } => payload.as_str(),
        }
    }

    /// Returns the key name and action for key messages.
    pub fn as_key(&self) -> Option<(&str, KeyAction)> {
        match self {
            WireMessage::KeyPress(name) => Some((name.as_str(), KeyAction::Press)),
            WireMessage::KeyRelease(name) => Some((name.as_str(), KeyAction::Release)),
            WireMessage::Disconnect | WireMessage::Unknown { .. } => None,
        }
    }
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind(), SEPARATOR, self.payload())
    }
}

/// Encodes `msg` into datagram bytes.
///
/// # Examples
///
/// ```rust
/// use keyshare_core::protocol::{encode_message, WireMessage};
///
/// let bytes = encode_message(&WireMessage::KeyPress("x".into()));
/// assert_eq!(bytes, b"key_press|x");
/// ```
pub fn encode_message(msg: &WireMessage) -> Vec<u8> {
    msg.to_string().into_bytes()
}

/// Splits datagram text into its `TYPE` and `PAYLOAD` parts.
///
/// Text without a separator yields an empty payload.
pub fn split_datagram(text: &str) -> (&str, &str) {
    text.split_once(SEPARATOR).unwrap_or((text, ""))
}

/// Decodes one datagram.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidUtf8`] when `bytes` is not UTF-8.
///
/// # Examples
///
/// ```rust
/// use keyshare_core::protocol::{decode_datagram, WireMessage};
///
/// let msg = decode_datagram(b"key_release|left").unwrap();
/// assert_eq!(msg, WireMessage::KeyRelease("left".into()));
/// ```
pub fn decode_datagram(bytes: &[u8]) -> Result<WireMessage, ProtocolError> {
    let text =
        std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8 { len: bytes.len() })?;
    let (kind, payload) = split_datagram(text);

    Ok(match kind {
        KEY_PRESS => WireMessage::KeyPress(payload.to_string()),
        KEY_RELEASE => WireMessage::KeyRelease(payload.to_string()),
        DISCONNECT => WireMessage::Disconnect,
        other => WireMessage::Unknown {
            kind: other.to_string(),
            payload: payload.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_key_press() {
        assert_eq!(encode_message(&WireMessage::KeyPress("x".into())), b"key_press|x");
    }

    #[test]
    fn test_encode_key_release() {
        assert_eq!(
            encode_message(&WireMessage::KeyRelease("left".into())),
            b"key_release|left"
        );
    }

    #[test]
    fn test_encode_disconnect_has_empty_payload() {
        assert_eq!(encode_message(&WireMessage::Disconnect), b"disconnect|");
    }

    #[test]
    fn test_key_press_round_trip_yields_type_and_payload() {
        // Arrange
        let bytes = encode_message(&WireMessage::key("x", KeyAction::Press));

        // Act
        let text = std::str::from_utf8(&bytes).unwrap();
        let (kind, payload) = split_datagram(text);

        // Assert
        assert_eq!(kind, "key_press");
        assert_eq!(payload, "x");
        assert_eq!(decode_datagram(&bytes).unwrap(), WireMessage::KeyPress("x".into()));
    }

    #[test]
    fn test_decode_without_separator_is_bare_type() {
        assert_eq!(decode_datagram(b"disconnect").unwrap(), WireMessage::Disconnect);
        assert_eq!(
            decode_datagram(b"key_press").unwrap(),
            WireMessage::KeyPress(String::new())
        );
    }

    #[test]
    fn test_decode_unknown_type_is_preserved() {
        let msg = decode_datagram(b"hello|world").unwrap();
        assert_eq!(
            msg,
            WireMessage::Unknown {
                kind: "hello".into(),
                payload: "world".into()
            }
        );
    }

    #[test]
    fn test_decode_splits_on_first_separator_only() {
        assert_eq!(
            decode_datagram(b"key_press||").unwrap(),
            WireMessage::KeyPress("|".into())
        );
    }

    #[test]
    fn test_decode_invalid_utf8_is_error() {
        let err = decode_datagram(&[0xFF, 0xFE, b'|', b'x']).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidUtf8 { len: 4 });
    }

    #[test]
    fn test_decode_empty_datagram_is_unknown() {
        assert_eq!(
            decode_datagram(b"").unwrap(),
            WireMessage::Unknown {
                kind: String::new(),
                payload: String::new()
            }
        );
    }

    #[test]
    fn test_as_key_returns_action() {
        assert_eq!(
            WireMessage::KeyRelease("x".into()).as_key(),
            Some(("x", KeyAction::Release))
        );
        assert_eq!(WireMessage::Disconnect.as_key(), None);
    }
}
