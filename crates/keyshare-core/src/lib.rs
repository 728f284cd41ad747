//! # keyshare-core
//!
//! Shared library for Keyshare containing the key-event domain, the textual
//! wire codec, the cross-thread event queue, and the process-wide role state.
//!
//! This crate is used by both the host and client applications.
//! It has no dependencies on OS input APIs or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! Keyshare lets several people share one single-player game as if each had
//! their own keyboard.  One machine (the "host") runs the game.  Every other
//! machine (a "client") captures a handful of its local key presses and
//! forwards them over UDP.  The host binds each sender to a player slot and
//! re-injects the key that slot is bound to.
//!
//! This crate (`keyshare-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure key-handling logic: the normalizer that turns raw
//!   key-down/key-up signals into clean press/release edges, the hotkey
//!   matcher, and the per-player key-binding table.
//!
//! - **`protocol`** – How key events travel over the network.  Each datagram
//!   is a short UTF-8 string such as `key_press|x`.
//!
//! - **`runtime`** – The pieces shared by the worker threads: the event queue,
//!   the role controller holding the running/tracking/triggers flags, and the
//!   input-capture loop.
//!
//! - **`capture`** – The two external capabilities (reading raw key events
//!   and injecting keys) expressed as traits, plus line-based and scripted
//!   key sources.
//!
//! - **`keymap`** – Key-name to native key-code tables for injectors.
//!
//! - **`config`** – The TOML configuration file.

pub mod capture;
pub mod config;
pub mod domain;
pub mod keymap;
pub mod protocol;
pub mod runtime;

pub use capture::{InjectionError, KeyInjector, KeySource};
pub use config::{AppConfig, ConfigError};
pub use domain::bindings::KeyBindingTable;
pub use domain::hotkey::{HotkeyAction, HotkeyMatcher, HotkeySet, MatchResult};
pub use domain::key_event::{KeyAction, KeyDirection, KeyEvent};
pub use domain::normalizer::{Edge, KeyPressNormalizer};
pub use domain::tracked::TrackedKeys;
pub use protocol::wire::{decode_datagram, encode_message, ProtocolError, WireMessage};
pub use runtime::input_loop::{InputLoop, InputSettings};
pub use runtime::queue::{EventQueue, QueueMessage};
pub use runtime::role::{Role, RoleController, RoleError};
