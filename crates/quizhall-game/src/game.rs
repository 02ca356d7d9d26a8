//! The game core: quiz, state record and current phase, without any of the
//! channels around them.
//!
//! Keeping this apart from the driver means actions and phases can be
//! exercised synchronously in tests; the [`Engine`](crate::Engine) only
//! adds the multiplexing.

use std::sync::Arc;

use quizhall_participant::{Mailbox, ParticipantError};
use quizhall_protocol::{GameAborted, Pin, PlayerId, Quiz, ServerMessage};

use crate::state::{PlayerSummary, State};
use crate::{ExitReason, GameConfig, Phase, Snapshot};

pub(crate) struct Game {
    pub(crate) pin: Pin,
    pub(crate) quiz: Arc<Quiz>,
    pub(crate) config: GameConfig,
    pub(crate) state: State,
    /// `None` is the terminal sentinel.
    pub(crate) phase: Option<Phase>,
    /// Reported to the reaper when the phase machine terminates.
    pub(crate) exit_reason: ExitReason,
}

impl Game {
    pub(crate) fn new(pin: Pin, quiz: Arc<Quiz>, config: GameConfig) -> Self {
        Self {
            pin,
            quiz,
            config,
            state: State::default(),
            phase: Some(Phase::WaitForHost),
            exit_reason: ExitReason::Completed,
        }
    }

    /// Steps the current phase once and stores its successor.
    pub(crate) fn advance(&mut self) {
        if let Some(phase) = self.phase.take() {
            self.phase = phase.step(self);
        }
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.phase.is_none()
    }

    /// Tells everyone the game is over early. Used on the deadline path.
    pub(crate) fn abort(&mut self, reason: &str) {
        let message = ServerMessage::GameAborted(GameAborted {
            reason: reason.to_string(),
        });
        self.emit_to_host(message.clone());
        self.emit_to_players(message);
        self.state.accepting_answers = false;
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            pin: self.pin,
            status: state.status,
            phase: self.phase.clone(),
            host_attached: state.host.is_some(),
            players: state
                .players
                .iter()
                .map(|p| PlayerSummary {
                    id: p.id,
                    name: p.name.clone(),
                    left: p.left,
                })
                .collect(),
            current_question: state.current_question,
            total_questions: self.quiz.len(),
            countdown_done: state.countdown_done,
            accepting_answers: state.accepting_answers,
            want_answers: state.want_answers,
            got_answers: state.got_answers,
            round_players: state.round_players.clone(),
            leaderboard: state.leaderboard(),
        }
    }

    // -- Outbound ----------------------------------------------------------

    pub(crate) fn emit_to_host(&self, message: ServerMessage) {
        if let Some(host) = &self.state.host {
            deliver(self.pin, "host", host, message);
        }
    }

    pub(crate) fn emit_to_player(&self, id: PlayerId, message: ServerMessage) {
        if let Some(player) = self.state.player(id) {
            deliver(self.pin, "player", &player.mailbox, message);
        }
    }

    /// Sends to every player that hasn't left.
    pub(crate) fn emit_to_players(&self, message: ServerMessage) {
        for player in self.state.active_players() {
            deliver(self.pin, "player", &player.mailbox, message.clone());
        }
    }
}

/// Posts without waiting. A full or closed mailbox loses the message.
fn deliver(pin: Pin, recipient: &'static str, mailbox: &Mailbox, message: ServerMessage) {
    let kind = message.kind();
    match mailbox.post(message) {
        Ok(()) => {}
        Err(ParticipantError::Overflow) => {
            tracing::warn!(%pin, recipient, %kind, "mailbox full, message dropped");
        }
        Err(e) => {
            tracing::debug!(%pin, recipient, %kind, error = %e, "message not delivered");
        }
    }
}
