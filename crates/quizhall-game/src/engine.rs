//! The per-game driver: an isolated Tokio task that owns one game.
//!
//! The driver owns the state record, the inbox, the read port and the
//! lifetime deadline. Each loop iteration waits for exactly one event,
//! handles it, then steps the current phase. Nothing outside the driver
//! ever touches the state; everyone else goes through a [`GameHandle`].

use std::sync::Arc;
use std::time::Duration;

use quizhall_deadline::Deadline;
use quizhall_protocol::{Pin, Quiz, Status};
use tokio::sync::{mpsc, oneshot};

use crate::game::Game;
use crate::{Action, ExitReason, GameConfig, GameError, GameHandle, Reaped, Snapshot};

/// Reason sent to everyone when the lifetime deadline cuts a game off.
const TIME_LIMIT_REASON: &str = "time limit reached";

/// One iteration's worth of input, taken out of the multiplex so it can be
/// handled without the select's borrows.
enum Event {
    Expired,
    Action(Action),
    Read(oneshot::Sender<Snapshot>),
}

/// The session engine for one game.
///
/// Create it, hand out [`handle`](Self::handle)s, then drive it with
/// [`run`](Self::run). The engine is consumed by `run` and every handle
/// reports the game as unavailable once it returns.
pub struct Engine {
    game: Game,
    inbox: mpsc::Receiver<Action>,
    reads: mpsc::Receiver<oneshot::Sender<Snapshot>>,
    handle: GameHandle,
    reaper: mpsc::Sender<Reaped>,
    reaper_timeout: Duration,
    deadline: Deadline,
}

impl Engine {
    /// Creates an engine with the default config and the given lifetime.
    ///
    /// A zero `max_lifetime` selects [`MAX_GAME_TIME`](crate::MAX_GAME_TIME).
    /// Must be called from within a Tokio runtime: the deadline is armed
    /// here.
    pub fn new(
        pin: Pin,
        quiz: Arc<Quiz>,
        reaper: mpsc::Sender<Reaped>,
        max_lifetime: Duration,
    ) -> Self {
        Self::with_config(pin, quiz, reaper, GameConfig::with_lifetime(max_lifetime))
    }

    /// Creates an engine with an explicit config.
    pub fn with_config(
        pin: Pin,
        quiz: Arc<Quiz>,
        reaper: mpsc::Sender<Reaped>,
        config: GameConfig,
    ) -> Self {
        let config = config.validated();
        let (inbox_tx, inbox) = mpsc::channel(config.inbox_capacity);
        let (reads_tx, reads) = mpsc::channel(config.read_capacity);
        let handle = GameHandle::new(
            pin,
            inbox_tx,
            reads_tx,
            config.submit_timeout,
            config.mailbox_capacity,
        );
        let deadline = Deadline::arm(config.lifetime);
        let reaper_timeout = config.reaper_timeout;

        Self {
            game: Game::new(pin, quiz, config),
            inbox,
            reads,
            handle,
            reaper,
            reaper_timeout,
            deadline,
        }
    }

    /// A handle for submitting actions and reading snapshots.
    pub fn handle(&self) -> GameHandle {
        self.handle.clone()
    }

    pub fn pin(&self) -> Pin {
        self.game.pin
    }

    /// Runs the game until it terminates, then reports it to the reaper.
    ///
    /// Returns the notification that was published.
    ///
    /// # Errors
    /// [`GameError::ReaperUnreachable`] if the reaper channel is closed or
    /// stays full past the configured reaper timeout.
    pub async fn run(mut self) -> Result<Reaped, GameError> {
        let pin = self.game.pin;
        tracing::info!(
            %pin,
            questions = self.game.quiz.len(),
            lifetime = ?self.deadline.lifetime(),
            "engine started"
        );

        while !self.game.is_terminated() {
            // Deadline first, then actions, then reads: a read queued after
            // an action always observes that action.
            let event = tokio::select! {
                biased;
                () = self.deadline.expired() => Event::Expired,
                Some(action) = self.inbox.recv() => Event::Action(action),
                Some(reply) = self.reads.recv() => Event::Read(reply),
            };

            match event {
                Event::Expired => {
                    tracing::info!(%pin, "lifetime deadline reached");
                    self.game.abort(TIME_LIMIT_REASON);
                    self.game.exit_reason = ExitReason::DeadlineExpired;
                    break;
                }
                Event::Action(action) => {
                    let kind = action.kind();
                    if let Err(e) = action.perform(&mut self.game) {
                        tracing::debug!(%pin, action = %kind, error = %e, "action dropped");
                    }
                }
                Event::Read(reply) => {
                    // The reader may have given up; nothing to do then.
                    let _ = reply.send(self.game.snapshot());
                }
            }

            self.game.advance();
        }

        self.shutdown().await
    }

    /// Marks the game dead, closes both ports, and publishes to the reaper.
    async fn shutdown(mut self) -> Result<Reaped, GameError> {
        let pin = self.game.pin;
        self.game.state.status = Status::Dead;
        self.game.state.accepting_answers = false;
        self.game.phase = None;

        self.inbox.close();
        self.reads.close();

        let dead = self.game.snapshot();
        while let Ok(reply) = self.reads.try_recv() {
            let _ = reply.send(dead.clone());
        }
        let mut discarded = 0usize;
        while self.inbox.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!(%pin, discarded, "actions discarded at shutdown");
        }

        let reaped = Reaped {
            pin,
            reason: self.game.exit_reason,
        };
        let published = self.reaper.send_timeout(reaped, self.reaper_timeout).await;
        self.deadline.release();

        match published {
            Ok(()) => {
                tracing::info!(%pin, reason = ?reaped.reason, "engine stopped");
                Ok(reaped)
            }
            Err(e) => {
                tracing::error!(%pin, error = %e, "could not notify reaper");
                Err(GameError::ReaperUnreachable(pin))
            }
        }
    }
}
