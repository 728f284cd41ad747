//! Infrastructure layer for the host.
//!
//! Contains the OS-facing adapters: the UDP receiver and the key injectors.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `keyshare_core`, but MUST NOT be imported by the `application` layer
//! outside of tests.

pub mod input_injection;
pub mod network;
