//! Inbound commands and their preconditions.
//!
//! Every change to a game's state from the outside arrives as an
//! [`Action`] through the inbox. The driver performs it against the game;
//! an action whose precondition fails is a logged no-op.
//!
//! | Action        | Precondition                                        |
//! |---------------|-----------------------------------------------------|
//! | HostAttach    | status is HostWaiting and no host attached          |
//! | HostDetach    | always                                              |
//! | PlayerJoin    | game not dead; handle new (or returning after leave)|
//! | PlayerLeave   | player is in the game                               |
//! | HostStart     | lobby, at least `min_players` active players        |
//! | CountdownDone | a question is showing, countdown not yet done       |
//! | SubmitAnswer  | answers open, sender in the round, first answer     |
//! | HostNext      | the current round is closed                         |
//! | HostFinish    | the game is ending                                  |

use std::fmt;

use quizhall_participant::Mailbox;
use quizhall_protocol::{AnswerAck, GameAborted, PlayerId, QuestionCount, ServerMessage, Status};

use crate::game::Game;
use crate::state::Player;
use crate::{ExitReason, GameError, Phase};

/// A command for a game engine.
#[derive(Debug)]
pub enum Action {
    /// Attach the host's mailbox.
    HostAttach { host: Mailbox },
    /// The host went away.
    HostDetach,
    /// A player joins with a stable handle and a display name.
    PlayerJoin {
        player: PlayerId,
        name: String,
        mailbox: Mailbox,
    },
    /// A player went away.
    PlayerLeave { player: PlayerId },
    /// The host starts the first question.
    HostStart,
    /// The countdown for the current question finished.
    CountdownDone,
    /// A player picks a choice for the current question.
    SubmitAnswer { player: PlayerId, choice: usize },
    /// The host moves on to the next question.
    HostNext,
    /// The host leaves the results screen.
    HostFinish,
}

/// The kind of an [`Action`], without its data. Used in logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    HostAttach,
    HostDetach,
    PlayerJoin,
    PlayerLeave,
    HostStart,
    CountdownDone,
    SubmitAnswer,
    HostNext,
    HostFinish,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::HostAttach { .. } => ActionKind::HostAttach,
            Self::HostDetach => ActionKind::HostDetach,
            Self::PlayerJoin { .. } => ActionKind::PlayerJoin,
            Self::PlayerLeave { .. } => ActionKind::PlayerLeave,
            Self::HostStart => ActionKind::HostStart,
            Self::CountdownDone => ActionKind::CountdownDone,
            Self::SubmitAnswer { .. } => ActionKind::SubmitAnswer,
            Self::HostNext => ActionKind::HostNext,
            Self::HostFinish => ActionKind::HostFinish,
        }
    }

    /// Applies this action to the game.
    ///
    /// # Errors
    /// [`GameError::PreconditionViolated`] when the action doesn't apply
    /// in the current state. The game is left unchanged.
    pub(crate) fn perform(self, game: &mut Game) -> Result<(), GameError> {
        match self {
            Self::HostAttach { host } => game.attach_host(host),
            Self::HostDetach => {
                game.detach_host();
                Ok(())
            }
            Self::PlayerJoin {
                player,
                name,
                mailbox,
            } => game.join(player, name, mailbox),
            Self::PlayerLeave { player } => game.leave(player),
            Self::HostStart => game.start(),
            Self::CountdownDone => game.countdown_done(),
            Self::SubmitAnswer { player, choice } => game.submit_answer(player, choice),
            Self::HostNext => game.next_question(),
            Self::HostFinish => game.finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Action bodies
// ---------------------------------------------------------------------------

impl Game {
    fn attach_host(&mut self, host: Mailbox) -> Result<(), GameError> {
        if self.state.status != Status::HostWaiting {
            return Err(GameError::precondition(
                ActionKind::HostAttach,
                format!("game is {}", self.state.status),
            ));
        }
        if self.state.host.is_some() {
            return Err(GameError::precondition(
                ActionKind::HostAttach,
                "host already attached",
            ));
        }

        self.state.host = Some(host);
        Ok(())
    }

    /// Mid-game, losing the host ends the game. In the lobby the game
    /// goes back to waiting for a host.
    fn detach_host(&mut self) {
        self.state.host = None;

        match self.state.status {
            Status::Running => {
                self.emit_to_players(ServerMessage::GameAborted(GameAborted {
                    reason: "host left".into(),
                }));
                self.exit_reason = ExitReason::HostDetached;
                self.phase = Some(Phase::Terminate);
                tracing::info!(pin = %self.pin, "host detached mid-game, terminating");
            }
            Status::Waiting => {
                self.phase = Some(Phase::WaitForHost);
                tracing::info!(pin = %self.pin, "host detached, waiting for a new host");
            }
            Status::HostWaiting | Status::Dead => {}
        }
    }

    fn join(&mut self, id: PlayerId, name: String, mailbox: Mailbox) -> Result<(), GameError> {
        if self.state.status.is_dead() {
            return Err(GameError::precondition(ActionKind::PlayerJoin, "game is dead"));
        }

        if let Some(existing) = self.state.players.iter_mut().find(|p| p.id == id) {
            if !existing.left {
                return Err(GameError::precondition(
                    ActionKind::PlayerJoin,
                    format!("player {id} already joined"),
                ));
            }
            // Came back before the round boundary removed them.
            existing.left = false;
            existing.name = name;
            existing.mailbox = mailbox;
            tracing::info!(pin = %self.pin, player_id = %id, "player rejoined");
            self.catch_up(id);
            return Ok(());
        }

        self.state.players.push(Player {
            id,
            name,
            mailbox,
            left: false,
        });
        tracing::info!(
            pin = %self.pin,
            player_id = %id,
            players = self.state.active_count(),
            late = self.state.status == Status::Running,
            "player joined"
        );
        self.catch_up(id);
        Ok(())
    }

    /// A player arriving while a question counts down gets the countdown
    /// the others already received; it will be part of that round.
    fn catch_up(&self, id: PlayerId) {
        let Some(index) = self.phase.as_ref().and_then(Phase::question_index) else {
            return;
        };
        if self.state.countdown_done || self.state.announced != Some(index) {
            return;
        }
        if let Some(question) = self.quiz.question(index) {
            self.emit_to_player(
                id,
                ServerMessage::QuestionCount(QuestionCount {
                    count: question.duration_secs,
                }),
            );
        }
    }

    /// Outside an open round the player is removed at once. Inside one a
    /// round player is tombstoned; if it hadn't answered yet the round
    /// stops waiting for it.
    fn leave(&mut self, id: PlayerId) -> Result<(), GameError> {
        let Some(index) = self.state.players.iter().position(|p| p.id == id && !p.left) else {
            return Err(GameError::precondition(
                ActionKind::PlayerLeave,
                format!("player {id} is not in the game"),
            ));
        };

        if self.state.accepting_answers && self.state.in_round(id) {
            self.state.players[index].left = true;
            if !self.state.answers.contains_key(&id) {
                self.state.round_players.retain(|p| *p != id);
                self.state.want_answers -= 1;
            }
            tracing::info!(pin = %self.pin, player_id = %id, "player left mid-round");
        } else {
            self.state.players.remove(index);
            self.state.scores.remove(&id);
            tracing::info!(
                pin = %self.pin,
                player_id = %id,
                players = self.state.active_count(),
                "player left"
            );
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), GameError> {
        let in_lobby = self.phase.as_ref().is_some_and(Phase::is_waiting);
        if self.state.status != Status::Waiting || !in_lobby {
            return Err(GameError::precondition(
                ActionKind::HostStart,
                format!("game is {}", self.state.status),
            ));
        }
        let players = self.state.active_count();
        if players < self.config.min_players {
            return Err(GameError::precondition(
                ActionKind::HostStart,
                format!("{players} players, need {}", self.config.min_players),
            ));
        }

        self.state.status = Status::Running;
        self.state.current_question = 0;
        self.state.countdown_done = false;
        self.state.announced = None;
        self.phase = Some(Phase::Question(0));
        tracing::info!(pin = %self.pin, players, "game started");
        Ok(())
    }

    fn countdown_done(&mut self) -> Result<(), GameError> {
        let showing = self.phase.as_ref().and_then(Phase::question_index).is_some();
        if !showing || self.state.countdown_done {
            return Err(GameError::precondition(
                ActionKind::CountdownDone,
                "no question is counting down",
            ));
        }

        self.state.countdown_done = true;
        Ok(())
    }

    fn submit_answer(&mut self, id: PlayerId, choice: usize) -> Result<(), GameError> {
        if !self.state.accepting_answers {
            return Err(GameError::precondition(
                ActionKind::SubmitAnswer,
                "answers are not open",
            ));
        }
        if !self.state.in_round(id) {
            return Err(GameError::precondition(
                ActionKind::SubmitAnswer,
                format!("player {id} is not in this round"),
            ));
        }
        if self.state.answers.contains_key(&id) {
            return Err(GameError::precondition(
                ActionKind::SubmitAnswer,
                format!("player {id} already answered"),
            ));
        }
        let index = self.state.current_question;
        let valid = self.quiz.question(index).is_some_and(|q| q.has_choice(choice));
        if !valid {
            return Err(GameError::precondition(
                ActionKind::SubmitAnswer,
                format!("choice {choice} does not exist"),
            ));
        }

        self.state.answers.insert(id, choice);
        self.state.got_answers += 1;
        self.emit_to_player(
            id,
            ServerMessage::AnswerAck(AnswerAck {
                index: index + 1,
                choice,
            }),
        );
        tracing::debug!(
            pin = %self.pin,
            player_id = %id,
            got = self.state.got_answers,
            want = self.state.want_answers,
            "answer recorded"
        );
        Ok(())
    }

    fn next_question(&mut self) -> Result<(), GameError> {
        if !self.phase.as_ref().is_some_and(Phase::is_round_closed) {
            return Err(GameError::precondition(
                ActionKind::HostNext,
                "the current round is still open",
            ));
        }

        self.state.current_question += 1;
        if self.state.current_question >= self.quiz.len() {
            self.phase = Some(Phase::GameEnding);
        } else {
            self.state.countdown_done = false;
            self.phase = Some(Phase::Question(self.state.current_question));
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), GameError> {
        if self.phase != Some(Phase::GameEnding) {
            return Err(GameError::precondition(
                ActionKind::HostFinish,
                "the game is not ending",
            ));
        }

        self.phase = Some(Phase::Terminate);
        tracing::info!(pin = %self.pin, "host finished the game");
        Ok(())
    }
}
