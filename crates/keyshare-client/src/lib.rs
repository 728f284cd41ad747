//! keyshare-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the client do?
//!
//! A client runs on each extra player's machine.  While tracking is enabled
//! (toggled with a hotkey, default `F3`) it forwards presses and releases of
//! the tracked keys to the host, one UDP datagram per edge:
//!
//! ```text
//! KeySource ─► InputLoop ─► EventQueue ─► ClientSender ─► UDP ─► host
//! ```
//!
//! On exit it sends a `disconnect` so the host frees its player slot.

/// Application layer: the sender loop.
pub mod application;

/// Infrastructure layer: the UDP socket.
pub mod infrastructure;
