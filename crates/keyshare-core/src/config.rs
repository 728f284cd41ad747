//! TOML configuration shared by the host and client binaries.
//!
//! The file is read once at startup; there is no hot reload.  Example:
//!
//! ```toml
//! log_level = "info"
//!
//! [keys]
//! exit = "f8"
//! toggle_tracking = "f3"
//! toggle_triggers = "f2"
//! tracked = ["left", "right", "x"]
//!
//! [network]
//! host_address = "192.168.1.20:7654"
//! bind_address = "0.0.0.0:7654"
//!
//! [keybinds]
//! 0 = { x = "s" }
//! 1 = { x = "k" }
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "...")]`, so a partial file (or an
//! empty one) is valid and missing values take the built-in defaults.  A file
//! that cannot be read or parsed is reported by [`load_config`]; callers that
//! must keep going use [`load_or_default`], which falls back to
//! [`AppConfig::default`] and returns the problem for the caller to log.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::bindings::{KeyBindingTable, PlayerBindings};

/// Default file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "keyshare.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A `[keybinds]` entry is not a player index.
    #[error("keybinds entry {0:?} is not a player index")]
    InvalidPlayerIndex(String),

    /// An address setting is not `ip:port`.
    #[error("invalid socket address {value:?} for {field}")]
    InvalidAddress { field: &'static str, value: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    /// Player index (as a string key) -> raw key -> host key.
    #[serde(default = "default_keybinds")]
    pub keybinds: BTreeMap<String, BTreeMap<String, String>>,
}

/// Local hotkeys and the set of keys a client forwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeysConfig {
    /// Stops the process.  A `+`-separated chord is accepted.
    #[serde(default = "default_exit_key")]
    pub exit: String,
    /// Toggles forwarding on a client.
    #[serde(default = "default_tracking_key")]
    pub toggle_tracking: String,
    /// Toggles injection on the host.
    #[serde(default = "default_triggers_key")]
    pub toggle_triggers: String,
    /// Chord that always stops the process.
    #[serde(default = "default_force_quit")]
    pub force_quit: String,
    /// Keys a client forwards.  Empty means every key.
    #[serde(default = "default_tracked")]
    pub tracked: Vec<String>,
    /// Forward every key regardless of `tracked`.
    #[serde(default)]
    pub track_all: bool,
}

/// Addresses and timings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// Where a client sends its datagrams.
    #[serde(default = "default_host_address")]
    pub host_address: String,
    /// Where the host listens.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Poll interval of the worker loops, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// How long a client keeps running after sending its disconnect.
    #[serde(default = "default_disconnect_grace_ms")]
    pub disconnect_grace_ms: u64,
    /// How often worker loops check whether a role has been selected.
    #[serde(default = "default_role_poll_interval_ms")]
    pub role_poll_interval_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_exit_key() -> String {
    "f8".to_string()
}
fn default_tracking_key() -> String {
    "f3".to_string()
}
fn default_triggers_key() -> String {
    "f2".to_string()
}
fn default_force_quit() -> String {
    "ctrl+c".to_string()
}
fn default_tracked() -> Vec<String> {
    ["left", "right", "x"].iter().map(|k| k.to_string()).collect()
}
fn default_host_address() -> String {
    "127.0.0.1:7654".to_string()
}
fn default_bind_address() -> String {
    "0.0.0.0:7654".to_string()
}
fn default_poll_interval_ms() -> u64 {
    1
}
fn default_disconnect_grace_ms() -> u64 {
    1000
}
fn default_role_poll_interval_ms() -> u64 {
    500
}
fn default_keybinds() -> BTreeMap<String, BTreeMap<String, String>> {
    KeyBindingTable::builtin_default()
        .players()
        .map(|(id, bindings)| {
            (
                id.to_string(),
                bindings.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            )
        })
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            keys: KeysConfig::default(),
            network: NetworkConfig::default(),
            keybinds: default_keybinds(),
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            exit: default_exit_key(),
            toggle_tracking: default_tracking_key(),
            toggle_triggers: default_triggers_key(),
            force_quit: default_force_quit(),
            tracked: default_tracked(),
            track_all: false,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host_address: default_host_address(),
            bind_address: default_bind_address(),
            poll_interval_ms: default_poll_interval_ms(),
            disconnect_grace_ms: default_disconnect_grace_ms(),
            role_poll_interval_ms: default_role_poll_interval_ms(),
        }
    }
}

// ── Derived values ────────────────────────────────────────────────────────────

impl AppConfig {
    /// Builds the key-binding table from `[keybinds]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPlayerIndex`] for a key that is not a
    /// non-negative integer.
    pub fn binding_table(&self) -> Result<KeyBindingTable, ConfigError> {
        let players = self
            .keybinds
            .iter()
            .map(|(index, bindings)| {
                let id = index
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidPlayerIndex(index.clone()))?;
                let bindings: PlayerBindings = bindings
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Ok((id, bindings))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(KeyBindingTable::from_players(players))
    }
}

impl NetworkConfig {
    /// Parsed [`NetworkConfig::host_address`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if the value is not `ip:port`.
    pub fn host_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr("host_address", &self.host_address)
    }

    /// Parsed [`NetworkConfig::bind_address`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if the value is not `ip:port`.
    pub fn bind_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_addr("bind_address", &self.bind_address)
    }

    /// Worker-loop poll interval, never shorter than one millisecond.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn disconnect_grace(&self) -> Duration {
        Duration::from_millis(self.disconnect_grace_ms)
    }

    pub fn role_poll_interval(&self) -> Duration {
        Duration::from_millis(self.role_poll_interval_ms.max(1))
    }
}

fn parse_addr(field: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses and validates configuration text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed TOML and
/// [`ConfigError::InvalidPlayerIndex`] for a bad `[keybinds]` entry.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let cfg: AppConfig = toml::from_str(content)?;
    cfg.binding_table()?;
    Ok(cfg)
}

/// Loads configuration from `path`, returning `AppConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found"
/// and the errors of [`parse_config`].
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads configuration from `path`, falling back to the defaults (including
/// the built-in key bindings) on any error.
///
/// The error, if any, is handed back rather than logged: the binaries read
/// the file before logging is initialised, since it carries the log level.
pub fn load_or_default(path: &Path) -> (AppConfig, Option<ConfigError>) {
    match load_config(path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "keyshare_cfg_{}_{}_{name}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ))
    }

    #[test]
    fn test_default_config_has_builtin_bindings() {
        // Arrange / Act
        let table = AppConfig::default().binding_table().expect("default is valid");

        // Assert
        assert_eq!(table.capacity(), 3);
        assert_eq!(table.lookup(1, "x"), Some("k"));
    }

    #[test]
    fn test_default_keys_and_network() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.keys.exit, "f8");
        assert_eq!(cfg.keys.toggle_tracking, "f3");
        assert_eq!(cfg.keys.toggle_triggers, "f2");
        assert_eq!(cfg.keys.tracked, vec!["left", "right", "x"]);
        assert_eq!(cfg.network.poll_interval(), Duration::from_millis(1));
        assert_eq!(cfg.network.disconnect_grace(), Duration::from_secs(1));
        assert_eq!(cfg.network.bind_socket_addr().unwrap().port(), 7654);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let cfg = parse_config("").expect("empty config is valid");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_keybinds_section_is_parsed() {
        // Arrange
        let text = r#"
[keybinds]
0 = { left = "a", right = "d" }
1 = { left = "j", right = "l" }
"#;

        // Act
        let table = parse_config(text).unwrap().binding_table().unwrap();

        // Assert
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.lookup(0, "right"), Some("d"));
        assert_eq!(table.lookup(1, "left"), Some("j"));
        assert_eq!(table.lookup(1, "x"), None);
    }

    #[test]
    fn test_non_numeric_player_index_is_rejected() {
        let err = parse_config("[keybinds]\nalice = { x = \"s\" }\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPlayerIndex(ref k) if k == "alice"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        assert!(matches!(
            parse_config("[[[ not valid toml"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_partial_network_overrides_defaults() {
        let cfg = parse_config("[network]\nhost_address = \"10.0.0.5:9000\"\n").unwrap();

        assert_eq!(
            cfg.network.host_socket_addr().unwrap(),
            "10.0.0.5:9000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(cfg.network.bind_address, "0.0.0.0:7654");
    }

    #[test]
    fn test_invalid_address_is_reported() {
        let mut cfg = AppConfig::default();
        cfg.network.host_address = "not-an-address".to_string();

        let err = cfg.network.host_socket_addr().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress { field: "host_address", .. }));
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let mut cfg = NetworkConfig::default();
        cfg.poll_interval_ms = 0;
        assert_eq!(cfg.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut cfg = AppConfig::default();
        cfg.keys.tracked = vec!["up".into(), "down".into()];
        cfg.network.disconnect_grace_ms = 250;

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let restored = parse_config(&text).expect("deserialize");

        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_load_config_missing_file_returns_default() {
        let path = temp_path("missing.toml");
        let cfg = load_config(&path).expect("missing file is not an error");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_load_or_default_falls_back_on_bad_file() {
        // Arrange
        let path = temp_path("bad.toml");
        std::fs::write(&path, "[keybinds]\nnope = { x = \"s\" }\n").unwrap();

        // Act
        let (cfg, err) = load_or_default(&path);

        // Assert
        assert!(matches!(err, Some(ConfigError::InvalidPlayerIndex(_))));
        assert_eq!(cfg.binding_table().unwrap(), KeyBindingTable::builtin_default());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_config_reads_file() {
        let path = temp_path("good.toml");
        std::fs::write(&path, "log_level = \"debug\"\n[keys]\nexit = \"f10\"\n").unwrap();

        let cfg = load_config(&path).unwrap();

        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.keys.exit, "f10");
        std::fs::remove_file(&path).ok();
    }
}
