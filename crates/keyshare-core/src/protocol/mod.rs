//! Protocol module containing the textual datagram codec.

pub mod wire;

pub use wire::{decode_datagram, encode_message, split_datagram, ProtocolError, WireMessage};
