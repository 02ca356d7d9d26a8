//! Engine configuration.

use std::time::Duration;

use quizhall_deadline::LifetimeConfig;
use quizhall_participant::DEFAULT_MAILBOX_CAPACITY;
use serde::{Deserialize, Serialize};

/// Players required before the host may start a game.
pub const MIN_PLAYERS: usize = 3;

/// Configuration for one game engine.
///
/// The coordinator applies the same config to every game it creates;
/// tests usually start from `GameConfig::default()` and override a field
/// or two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Minimum active players required to leave the lobby.
    pub min_players: usize,

    /// Bound of the action inbox.
    pub inbox_capacity: usize,

    /// Bound of the read port.
    pub read_capacity: usize,

    /// How long a sender waits for inbox space before the action is
    /// discarded.
    pub submit_timeout: Duration,

    /// How long the engine waits for reaper space when it terminates.
    pub reaper_timeout: Duration,

    /// Queue depth of each host/player mailbox created through a
    /// [`GameHandle`](crate::GameHandle).
    pub mailbox_capacity: usize,

    /// Lifetime bound; zero selects the maximum game time.
    pub lifetime: LifetimeConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: MIN_PLAYERS,
            inbox_capacity: 32,
            read_capacity: 32,
            submit_timeout: Duration::from_millis(250),
            reaper_timeout: Duration::from_secs(1),
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            lifetime: LifetimeConfig::default(),
        }
    }
}

impl GameConfig {
    /// Default config with a specific requested lifetime.
    pub fn with_lifetime(max_lifetime: Duration) -> Self {
        Self {
            lifetime: LifetimeConfig::with_max(max_lifetime),
            ..Self::default()
        }
    }

    /// Fix values that would make channels unusable.
    ///
    /// Tokio channels panic on a zero capacity, so every capacity is
    /// raised to at least 1.
    pub fn validated(mut self) -> Self {
        self.inbox_capacity = self.inbox_capacity.max(1);
        self.read_capacity = self.read_capacity.max(1);
        self.mailbox_capacity = self.mailbox_capacity.max(1);
        self.lifetime = self.lifetime.validated();
        self
    }
}
