//! Per-player key-binding table applied by the host.
//!
//! Every client sends the same raw key names (e.g. everyone presses `x`).  The
//! host tells players apart by sender address, assigns each one a slot, and
//! looks the raw key up in that slot's bindings to find the key to inject:
//!
//! ```text
//! player 0: x -> s
//! player 1: x -> k
//! player 2: x -> n
//! ```
//!
//! The number of player entries is the host's capacity: a fourth sender in
//! the table above is turned away.

use std::collections::{BTreeMap, HashMap};

/// Raw key name -> host key name, for one player.
pub type PlayerBindings = HashMap<String, String>;

/// Read-only mapping from player slot to that player's key bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBindingTable {
    players: BTreeMap<usize, PlayerBindings>,
}

impl KeyBindingTable {
    /// Creates an empty table (capacity 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(player_id, bindings)` pairs.
    pub fn from_players<I>(players: I) -> Self
    where
        I: IntoIterator<Item = (usize, PlayerBindings)>,
    {
        Self {
            players: players.into_iter().collect(),
        }
    }

    /// The mapping used when no configuration could be loaded: the `x` key of
    /// players 0, 1 and 2 maps to `s`, `k` and `n` on the host.
    pub fn builtin_default() -> Self {
        Self::from_players(
            [(0, "s"), (1, "k"), (2, "n")]
                .into_iter()
                .map(|(player, host_key)| (player, single("x", host_key))),
        )
    }

    /// Adds or replaces one binding.
    pub fn bind(&mut self, player_id: usize, raw_key: impl Into<String>, host_key: impl Into<String>) {
        self.players
            .entry(player_id)
            .or_default()
            .insert(raw_key.into(), host_key.into());
    }

    /// Maximum number of concurrent players.
    pub fn capacity(&self) -> usize {
        self.players.len()
    }

    /// Returns the host key bound to `raw_key` for `player_id`.
    pub fn lookup(&self, player_id: usize, raw_key: &str) -> Option<&str> {
        self.players
            .get(&player_id)
            .and_then(|bindings| bindings.get(raw_key))
            .map(String::as_str)
    }

    /// Iterates over players in ascending slot order.
    pub fn players(&self) -> impl Iterator<Item = (usize, &PlayerBindings)> {
        self.players.iter().map(|(id, bindings)| (*id, bindings))
    }
}

fn single(raw_key: &str, host_key: &str) -> PlayerBindings {
    let mut bindings = PlayerBindings::new();
    bindings.insert(raw_key.to_string(), host_key.to_string());
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_default_has_three_players() {
        let table = KeyBindingTable::builtin_default();

        assert_eq!(table.capacity(), 3);
        assert_eq!(table.lookup(0, "x"), Some("s"));
        assert_eq!(table.lookup(1, "x"), Some("k"));
        assert_eq!(table.lookup(2, "x"), Some("n"));
    }

    #[test]
    fn test_lookup_unknown_key_or_player_is_none() {
        let table = KeyBindingTable::builtin_default();

        assert_eq!(table.lookup(0, "left"), None);
        assert_eq!(table.lookup(7, "x"), None);
    }

    #[test]
    fn test_bind_creates_player_entry() {
        // Arrange
        let mut table = KeyBindingTable::new();
        assert_eq!(table.capacity(), 0);

        // Act
        table.bind(0, "left", "a");
        table.bind(0, "right", "d");
        table.bind(1, "left", "j");

        // Assert
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.lookup(0, "right"), Some("d"));
        assert_eq!(table.lookup(1, "left"), Some("j"));
    }

    #[test]
    fn test_players_iterate_in_slot_order() {
        let mut table = KeyBindingTable::new();
        table.bind(2, "x", "n");
        table.bind(0, "x", "s");

        let ids: Vec<usize> = table.players().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 2]);
    }
}
