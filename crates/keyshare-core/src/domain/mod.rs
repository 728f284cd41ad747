//! Domain entities for Keyshare.
//!
//! This module contains pure key-handling logic with no infrastructure
//! dependencies.  Nothing here touches a socket, a thread, or the OS input
//! APIs, so every type can be unit-tested in isolation.
//!
//! - [`key_event`] – raw capture signals and the press/release actions derived
//!   from them.
//! - [`normalizer`] – suppresses OS auto-repeat and turns raw signals into
//!   edge-triggered press/release events.
//! - [`hotkey`] – recognizes chorded key sequences such as `ctrl+c`.
//! - [`bindings`] – the per-player key-binding table applied by the host.
//! - [`tracked`] – which keys a client forwards.

pub mod bindings;
pub mod hotkey;
pub mod key_event;
pub mod normalizer;
pub mod tracked;
