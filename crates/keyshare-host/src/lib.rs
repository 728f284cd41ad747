//! keyshare-host library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the host do?
//!
//! The host is the machine running the game.  It listens for key events sent
//! by clients over UDP, gives each new sender a player slot, looks the
//! received key up in that player's bindings and injects the bound key
//! locally:
//!
//! ```text
//! UDP ─► HostReceiver ─► EventQueue ─► SessionWorker ─► SessionManager ─► KeyInjector
//! ```
//!
//! Injection only happens while triggers are enabled; the host operator
//! toggles them with a hotkey (default `F2`).

/// Application layer: session management and the consumer loop.
pub mod application;

/// Infrastructure layer: UDP receiver and key injectors.
pub mod infrastructure;
