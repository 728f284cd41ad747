//! Network adapters for the host.

pub mod receiver;

pub use receiver::{start_host_receiver, HostReceiver, ReceiverError};
