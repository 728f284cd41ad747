//! Application layer for the client.

pub mod forward_events;
