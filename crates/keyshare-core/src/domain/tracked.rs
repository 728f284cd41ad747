//! The set of keys a client forwards to the host.

use std::collections::HashSet;

/// Filter deciding which key names are forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedKeys {
    /// Every key is forwarded.
    All,
    /// Only the listed key names are forwarded.
    Only(HashSet<String>),
}

impl TrackedKeys {
    /// Builds the filter from configuration.
    ///
    /// An empty list, or `track_all`, tracks every key.
    pub fn from_config(names: &[String], track_all: bool) -> Self {
        if track_all || names.is_empty() {
            TrackedKeys::All
        } else {
            TrackedKeys::Only(names.iter().cloned().collect())
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            TrackedKeys::All => true,
            TrackedKeys::Only(names) => names.contains(name),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, TrackedKeys::All)
    }
}
