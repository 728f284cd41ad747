//! EventQueue: thread-safe FIFO between the worker threads.
//!
//! A thin wrapper over a `std::sync::mpsc` channel.  `put` never blocks and
//! the queue is unbounded; throughput is bounded by how fast humans press
//! keys.  `get_timeout` parks the consumer for at most one poll interval, so a
//! consumer loop re-checks the running flag with bounded latency even when
//! nothing arrives.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::domain::key_event::KeyAction;

/// Items carried by the queue.
///
/// The client enqueues `Key`, `Disconnect` and `Exit`; the host enqueues
/// `RawDatagram` and `Exit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueMessage {
    /// A tracked key edge to forward to the host.
    Key { name: String, action: KeyAction },
    /// Tell the host this client is leaving.
    Disconnect,
    /// Shutdown sentinel; wakes a consumer parked on an empty queue.
    Exit,
    /// A datagram received by the host, not yet decoded.
    RawDatagram { bytes: Vec<u8>, sender: SocketAddr },
}

/// Unbounded multi-producer FIFO with a timed blocking `get`.
///
/// The queue owns both ends of its channel, so the channel never disconnects.
#[derive(Debug)]
pub struct EventQueue<T = QueueMessage> {
    tx: Sender<T>,
    rx: Mutex<Receiver<T>>,
    queued: AtomicUsize,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx: Mutex::new(rx),
            queued: AtomicUsize::new(0),
        }
    }

    /// Appends `item` and wakes a waiting consumer.
    pub fn put(&self, item: T) {
        // Counted before sending; a consumer decrements only after receiving
        self.queued.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(item).is_err() {
            self.queued.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Removes the oldest item, waiting up to `timeout` for one to arrive.
    pub fn get_timeout(&self, timeout: Duration) -> Option<T> {
        let item = self.receiver().recv_timeout(timeout).ok();
        self.taken(item)
    }

    /// Removes the oldest item without waiting.
    pub fn try_get(&self) -> Option<T> {
        let item = self.receiver().try_recv().ok();
        self.taken(item)
    }

    pub fn len(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn taken(&self, item: Option<T>) -> Option<T> {
        if item.is_some() {
            self.queued.fetch_sub(1, Ordering::SeqCst);
        }
        item
    }

    // A panicking consumer cannot corrupt the channel, so a poisoned lock is
    // still safe to use.
    fn receiver(&self) -> MutexGuard<'_, Receiver<T>> {
        self.rx.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
