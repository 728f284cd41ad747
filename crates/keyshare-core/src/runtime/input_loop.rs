//! The input-capture loop shared by both roles.
//!
//! ```text
//! KeySource ─► KeyPressNormalizer ─► HotkeySet ─► role toggles ─► EventQueue
//! ```
//!
//! For every raw key signal the loop:
//!
//! 1. Normalizes it; auto-repeat is dropped, the exit key starts shutdown.
//! 2. Feeds press/release edges to the registered hotkeys in order (exit and
//!    force-quit first).  A hotkey that stops the program ends the loop.
//! 3. On a press, toggles tracking (client) or triggers (host) when the
//!    dedicated key is pressed.
//! 4. Otherwise, on a client with tracking enabled, forwards presses and
//!    releases of tracked keys to the queue.
//!
//! Reading the key source is the only truly blocking call in the process and
//! it cannot be interrupted from another thread; the loop notices a cleared
//! running flag on its next iteration.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

use super::queue::{EventQueue, QueueMessage};
use super::role::{Role, RoleController};
use crate::capture::KeySource;
use crate::config::AppConfig;
use crate::domain::hotkey::{HotkeyAction, HotkeyMatcher, HotkeySet};
use crate::domain::key_event::KeyAction;
use crate::domain::normalizer::{Edge, KeyPressNormalizer};
use crate::domain::tracked::TrackedKeys;

/// Key names and timings used by the input loop.
#[derive(Debug, Clone)]
pub struct InputSettings {
    pub exit_key: String,
    pub force_quit: String,
    pub toggle_tracking: String,
    pub toggle_triggers: String,
    pub tracked: TrackedKeys,
    pub role_poll_interval: Duration,
}

impl InputSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            exit_key: cfg.keys.exit.clone(),
            force_quit: cfg.keys.force_quit.clone(),
            toggle_tracking: cfg.keys.toggle_tracking.clone(),
            toggle_triggers: cfg.keys.toggle_triggers.clone(),
            tracked: TrackedKeys::from_config(&cfg.keys.tracked, cfg.keys.track_all),
            role_poll_interval: cfg.network.role_poll_interval(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// The input-capture loop.
pub struct InputLoop<S> {
    source: S,
    normalizer: KeyPressNormalizer,
    hotkeys: HotkeySet,
    settings: InputSettings,
    controller: Arc<RoleController>,
    queue: Arc<EventQueue>,
}

impl<S: KeySource> InputLoop<S> {
    /// Creates the loop with the exit and force-quit hotkeys registered.
    pub fn new(
        source: S,
        settings: InputSettings,
        controller: Arc<RoleController>,
        queue: Arc<EventQueue>,
    ) -> Self {
        let hotkeys = default_hotkeys(&settings, &controller, &queue);
        Self {
            source,
            normalizer: KeyPressNormalizer::new(settings.exit_key.clone()),
            hotkeys,
            settings,
            controller,
            queue,
        }
    }

    /// Registers an additional hotkey, evaluated after the built-in ones.
    pub fn register_hotkey(&mut self, matcher: HotkeyMatcher) {
        self.hotkeys.register(matcher);
    }

    /// Runs until the process stops or the source closes.
    pub fn run(mut self) {
        let Some(role) = self.controller.wait_for_role(self.settings.role_poll_interval) else {
            info!("exiting input thread...");
            return;
        };

        if role == Role::Client && self.settings.tracked.is_all() {
            warn!("tracking ALL keys");
        }

        while self.controller.is_running() {
            let Some(event) = self.source.read_next_key_event() else {
                info!("key source closed");
                self.controller.trigger_exit(&self.queue);
                break;
            };

            match self.normalizer.process(&event) {
                Edge::Exit => {
                    self.controller.trigger_exit(&self.queue);
                    break;
                }
                Edge::Pressed => {
                    let stopped = self.hotkeys.dispatch(&event.name, KeyAction::Press);
                    if stopped || !self.controller.is_running() {
                        break;
                    }
                    self.on_press(role, &event.name);
                }
                Edge::Released => {
                    self.hotkeys.dispatch(&event.name, KeyAction::Release);
                    self.on_release(role, &event.name);
                }
                Edge::Ignored => {}
            }
        }

        info!("exiting input thread...");
    }

    fn on_press(&self, role: Role, name: &str) {
        if name == self.settings.toggle_tracking && role != Role::Host {
            let on = self.controller.toggle_tracking();
            warn!(
                "tracking {} [{}]",
                if on { "active" } else { "disabled" },
                name.to_uppercase()
            );
        } else if name == self.settings.toggle_triggers && role == Role::Host {
            let on = self.controller.toggle_triggers();
            warn!(
                "triggers {} [{}]",
                if on { "active" } else { "disabled" },
                name.to_uppercase()
            );
        } else if self.should_forward(role, name) {
            self.forward(name, KeyAction::Press);
        }
    }

    fn on_release(&self, role: Role, name: &str) {
        if !self.is_toggle_key(role, name) && self.should_forward(role, name) {
            self.forward(name, KeyAction::Release);
        }
    }

    // Toggle keys act locally and never travel to the host.
    fn is_toggle_key(&self, role: Role, name: &str) -> bool {
        match role {
            Role::Host => name == self.settings.toggle_triggers,
            _ => name == self.settings.toggle_tracking,
        }
    }

    fn should_forward(&self, role: Role, name: &str) -> bool {
        role == Role::Client && self.controller.is_tracking() && self.settings.tracked.contains(name)
    }

    fn forward(&self, name: &str, action: KeyAction) {
        self.queue.put(QueueMessage::Key {
            name: name.to_string(),
            action,
        });
        match action {
            KeyAction::Press => info!("pressed: {name}"),
            KeyAction::Release => info!("released: {name}"),
        }
    }
}

impl<S: KeySource + 'static> InputLoop<S> {
    /// Runs the loop on a dedicated thread named `keyshare-input`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("keyshare-input".to_string())
            .spawn(move || self.run())
    }
}

/// Builds the hotkeys every process has: the exit chord and the force-quit chord.
fn default_hotkeys(
    settings: &InputSettings,
    controller: &Arc<RoleController>,
    queue: &Arc<EventQueue>,
) -> HotkeySet {
    let mut set = HotkeySet::new();

    let (c, q) = (Arc::clone(controller), Arc::clone(queue));
    set.register(HotkeyMatcher::parse(&settings.exit_key, move || {
        c.trigger_exit(&q);
        HotkeyAction::Stop
    }));

    let (c, q) = (Arc::clone(controller), Arc::clone(queue));
    let combo = settings.force_quit.clone();
    set.register(HotkeyMatcher::parse(&settings.force_quit, move || {
        warn!("forcibly exiting ({combo})");
        c.trigger_exit(&q);
        HotkeyAction::Stop
    }));

    set
}
