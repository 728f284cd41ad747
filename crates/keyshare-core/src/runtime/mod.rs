//! Runtime pieces shared by the worker threads of both roles.
//!
//! - [`queue`] – the FIFO that decouples capture from transmission (client)
//!   and reception from session handling (host).
//! - [`role`] – the process-wide role and running/tracking/triggers flags,
//!   plus the single trigger-exit procedure.
//! - [`input_loop`] – the input-capture loop: key source, normalizer,
//!   hotkeys, role toggles, queue.

pub mod input_loop;
pub mod queue;
pub mod role;
