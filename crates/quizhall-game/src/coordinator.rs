//! Coordinator: mints PINs, spawns engines, and reaps finished games.

use std::collections::HashMap;
use std::sync::Arc;

use quizhall_protocol::{Pin, Quiz};
use rand::Rng;
use tokio::sync::mpsc;

use crate::{Engine, GameConfig, GameError, GameHandle, Reaped, reaper_channel};

/// PINs are six decimal digits.
const PIN_SPACE: u32 = 1_000_000;

/// Random draws before giving up on finding a free PIN.
const MAX_PIN_ATTEMPTS: usize = 64;

/// Reaper channel capacity.
const REAPER_CAPACITY: usize = 64;

/// Tracks every live game by PIN.
///
/// Each game runs as its own spawned [`Engine`]. When an engine terminates
/// it publishes a [`Reaped`] notification; [`reap_next`](Self::reap_next)
/// consumes those and drops the game from the index.
pub struct Coordinator {
    games: HashMap<Pin, GameHandle>,
    config: GameConfig,
    reaper_tx: mpsc::Sender<Reaped>,
    reaper_rx: mpsc::Receiver<Reaped>,
}

impl Coordinator {
    /// Creates a coordinator that starts games with the default config.
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        let (reaper_tx, reaper_rx) = reaper_channel(REAPER_CAPACITY);
        Self {
            games: HashMap::new(),
            config,
            reaper_tx,
            reaper_rx,
        }
    }

    /// Validates `quiz`, spawns an engine for it and returns the new PIN.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// - [`GameError::Quiz`] — the quiz can't be played.
    /// - [`GameError::PinSpaceExhausted`] — no free PIN was found.
    pub fn create_game(&mut self, quiz: Arc<Quiz>) -> Result<Pin, GameError> {
        quiz.validate()?;
        let pin = self.mint_pin()?;

        let engine = Engine::with_config(pin, quiz, self.reaper_tx.clone(), self.config.clone());
        self.games.insert(pin, engine.handle());

        tokio::spawn(async move {
            if let Err(e) = engine.run().await {
                tracing::error!(%pin, error = %e, "engine failed");
            }
        });

        tracing::info!(%pin, games = self.games.len(), "game created");
        Ok(pin)
    }

    fn mint_pin(&self) -> Result<Pin, GameError> {
        let mut rng = rand::rng();
        for _ in 0..MAX_PIN_ATTEMPTS {
            let pin = Pin(rng.random_range(0..PIN_SPACE));
            if !self.games.contains_key(&pin) {
                return Ok(pin);
            }
        }
        Err(GameError::PinSpaceExhausted)
    }

    /// The handle of a live game.
    pub fn handle(&self, pin: Pin) -> Option<GameHandle> {
        self.games.get(&pin).cloned()
    }

    /// Waits for the next terminated game and removes it from the index.
    pub async fn reap_next(&mut self) -> Option<Reaped> {
        let reaped = self.reaper_rx.recv().await?;
        self.forget(reaped);
        Some(reaped)
    }

    /// Like [`reap_next`](Self::reap_next) but returns `None` at once if no
    /// game has terminated.
    pub fn try_reap(&mut self) -> Option<Reaped> {
        let reaped = self.reaper_rx.try_recv().ok()?;
        self.forget(reaped);
        Some(reaped)
    }

    fn forget(&mut self, reaped: Reaped) {
        self.games.remove(&reaped.pin);
        tracing::info!(
            pin = %reaped.pin,
            reason = ?reaped.reason,
            games = self.games.len(),
            "game reaped"
        );
    }

    /// Number of live games.
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// PINs of all live games.
    pub fn pins(&self) -> Vec<Pin> {
        self.games.keys().copied().collect()
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
