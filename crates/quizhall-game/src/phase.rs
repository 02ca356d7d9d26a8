//! The phase state machine.
//!
//! A phase is a tagged value; after every driver event the current phase
//! is stepped and replaced by whatever the step returns. Stepping
//! `Terminate` yields `None`, the terminal sentinel that ends the driver
//! loop.
//!
//! ```text
//! WaitForHost ──host attached──→ Sustain(WaitForHost)      (lobby)
//!                                   │ HostStart
//!                                   ▼
//!                  ┌──────────→ Question(i) ──countdown done──→ AcceptAnswers
//!                  │ HostNext                                     │ all answered
//!                  └──────────── Sustain(AcceptAnswers) ←─────────┘
//!                                   │ HostNext past the last question
//!                                   ▼
//!                               GameEnding ──HostFinish──→ Terminate ──→ None
//! ```
//!
//! Steps never block. Outbound messages are posted to mailboxes and the
//! step returns immediately.

use std::fmt;
use std::sync::Arc;

use quizhall_protocol::{
    GameOver, NewQuestion, QuestionCount, RoundResult, ServerMessage, Status,
};
use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::game::Game;

/// The current phase of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the host to attach.
    WaitForHost,
    /// Showing question `i` (0-based); answers open once the countdown is
    /// done.
    Question(usize),
    /// Collecting answers from the round's players.
    AcceptAnswers,
    /// Holding still until an action moves the game on. Carries the
    /// phase that led here: `WaitForHost` is the lobby, `AcceptAnswers`
    /// a closed round.
    Sustain(Box<Phase>),
    /// Results are out; waiting for the host to finish.
    GameEnding,
    /// Ends the driver loop on the next step.
    Terminate,
}

impl Phase {
    /// The lobby: host attached, waiting for players and a start.
    pub fn waiting() -> Self {
        Self::Sustain(Box::new(Self::WaitForHost))
    }

    /// Between rounds: every round player answered, waiting for HostNext.
    pub fn round_closed() -> Self {
        Self::Sustain(Box::new(Self::AcceptAnswers))
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Sustain(prev) if **prev == Self::WaitForHost)
    }

    pub fn is_round_closed(&self) -> bool {
        matches!(self, Self::Sustain(prev) if **prev == Self::AcceptAnswers)
    }

    /// The question index if this is a `Question` phase.
    pub fn question_index(&self) -> Option<usize> {
        match self {
            Self::Question(i) => Some(*i),
            _ => None,
        }
    }

    /// Runs this phase once against the game and returns its successor.
    pub(crate) fn step(self, game: &mut Game) -> Option<Phase> {
        match self {
            Self::WaitForHost => Some(game.wait_for_host()),
            Self::Question(i) => Some(game.question(i)),
            Self::AcceptAnswers => Some(game.accept_answers()),
            Self::Sustain(prev) => Some(Self::Sustain(prev)),
            Self::GameEnding => Some(game.game_ending()),
            Self::Terminate => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitForHost => write!(f, "WaitForHost"),
            Self::Question(i) => write!(f, "Question({i})"),
            Self::AcceptAnswers => write!(f, "AcceptAnswers"),
            Self::Sustain(prev) => write!(f, "Sustain({prev})"),
            Self::GameEnding => write!(f, "GameEnding"),
            Self::Terminate => write!(f, "Terminate"),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase bodies
// ---------------------------------------------------------------------------

impl Game {
    pub(crate) fn wait_for_host(&mut self) -> Phase {
        self.state.status = Status::HostWaiting;

        if self.state.host.is_some() {
            self.state.status = Status::Waiting;
            tracing::info!(pin = %self.pin, "host attached, lobby open");
            return Phase::waiting();
        }
        Phase::WaitForHost
    }

    /// Before the countdown: announce the question once. After it:
    /// freeze the round's players and open answers.
    pub(crate) fn question(&mut self, index: usize) -> Phase {
        let quiz = Arc::clone(&self.quiz);
        let Some(question) = quiz.question(index) else {
            return self.invalid_transition(format!(
                "question {} of {} does not exist",
                index + 1,
                quiz.len()
            ));
        };

        if !self.state.countdown_done {
            if self.state.announced != Some(index) {
                self.state.announced = Some(index);
                self.emit_to_host(ServerMessage::NewQuestion(NewQuestion {
                    question: question.clone(),
                    index: index + 1,
                    total: quiz.len(),
                }));
                self.emit_to_players(ServerMessage::QuestionCount(QuestionCount {
                    count: question.duration_secs,
                }));
                tracing::info!(
                    pin = %self.pin,
                    question = index + 1,
                    total = quiz.len(),
                    "question announced"
                );
            }
            return Phase::Question(index);
        }

        self.state.purge_departed();
        let round_players: Vec<_> = self.state.active_players().map(|p| p.id).collect();
        if round_players.is_empty() {
            return self.invalid_transition(format!(
                "question {} has no players to answer it",
                index + 1
            ));
        }

        self.state.want_answers = round_players.len();
        self.state.got_answers = 0;
        self.state.round_players = round_players;
        self.state.answers.clear();
        self.state.accepting_answers = true;

        tracing::info!(
            pin = %self.pin,
            question = index + 1,
            players = self.state.want_answers,
            "round opened"
        );
        Phase::AcceptAnswers
    }

    pub(crate) fn accept_answers(&mut self) -> Phase {
        if self.state.round_players.is_empty() {
            return self.invalid_transition(format!(
                "every player left question {} before answering",
                self.state.current_question + 1
            ));
        }
        self.state.accepting_answers = true;

        if self.state.got_answers >= self.state.want_answers {
            self.state.accepting_answers = false;
            self.close_round();
            return Phase::round_closed();
        }
        Phase::AcceptAnswers
    }

    /// Emits the final leaderboard once, then waits for HostFinish.
    pub(crate) fn game_ending(&mut self) -> Phase {
        if !self.state.results_sent {
            self.state.results_sent = true;
            self.state.accepting_answers = false;
            let message = ServerMessage::GameOver(GameOver {
                leaderboard: self.state.leaderboard(),
            });
            self.emit_to_host(message.clone());
            self.emit_to_players(message);
            tracing::info!(pin = %self.pin, "game ending, results sent");
        }
        Phase::GameEnding
    }

    /// Scores the round, reports it to the host, and drops departed players.
    fn close_round(&mut self) {
        let index = self.state.current_question;
        let Some(question) = self.quiz.question(index) else {
            return;
        };

        let mut tally = vec![0; question.choices.len()];
        for (player, &choice) in &self.state.answers {
            if let Some(count) = tally.get_mut(choice) {
                *count += 1;
            }
            if question.is_correct(choice) {
                *self.state.scores.entry(*player).or_insert(0) += 1;
            }
        }
        let correct = question.correct;

        self.state.purge_departed();
        self.emit_to_host(ServerMessage::RoundResult(RoundResult {
            index: index + 1,
            correct,
            answered: self.state.got_answers,
            tally,
            leaderboard: self.state.leaderboard(),
        }));

        tracing::info!(
            pin = %self.pin,
            question = index + 1,
            answered = self.state.got_answers,
            "round closed"
        );
    }

    /// Logs a transition that would break an invariant and routes the game
    /// to its ending.
    fn invalid_transition(&mut self, reason: String) -> Phase {
        let err = GameError::InvalidStateTransition(reason);
        tracing::warn!(pin = %self.pin, error = %err, "routing to game ending");
        self.state.accepting_answers = false;
        Phase::GameEnding
    }
}
