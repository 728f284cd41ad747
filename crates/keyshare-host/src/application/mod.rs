//! Application layer for the host.
//!
//! - [`manage_sessions`] – player slots, key bindings, injection.
//! - [`process_messages`] – the worker loop feeding queued datagrams to the
//!   session manager.

pub mod manage_sessions;
pub mod process_messages;
