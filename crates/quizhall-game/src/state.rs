//! The state record an engine owns, and the snapshots it hands out.

use std::collections::HashMap;

use quizhall_participant::Mailbox;
use quizhall_protocol::{Pin, PlayerId, ScoreEntry, Status};
use serde::{Deserialize, Serialize};

use crate::Phase;

/// A player as the engine tracks it.
#[derive(Debug)]
pub(crate) struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) mailbox: Mailbox,
    /// Left during an open round; physically removed at the next round
    /// boundary.
    pub(crate) left: bool,
}

/// The single mutable record of one game. Only the driver touches it.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) status: Status,
    pub(crate) host: Option<Mailbox>,
    pub(crate) players: Vec<Player>,
    pub(crate) current_question: usize,
    pub(crate) countdown_done: bool,
    pub(crate) accepting_answers: bool,
    pub(crate) want_answers: usize,
    pub(crate) got_answers: usize,
    pub(crate) round_players: Vec<PlayerId>,
    /// Choice recorded per round player for the open round.
    pub(crate) answers: HashMap<PlayerId, usize>,
    pub(crate) scores: HashMap<PlayerId, u32>,
    /// Question whose announcement has already gone out.
    pub(crate) announced: Option<usize>,
    pub(crate) results_sent: bool,
}

impl State {
    pub(crate) fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Players that haven't left.
    pub(crate) fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.left)
    }

    pub(crate) fn active_count(&self) -> usize {
        self.active_players().count()
    }

    pub(crate) fn in_round(&self, id: PlayerId) -> bool {
        self.round_players.contains(&id)
    }

    /// Physically removes tombstoned players.
    pub(crate) fn purge_departed(&mut self) {
        let scores = &mut self.scores;
        self.players.retain(|p| {
            if p.left {
                scores.remove(&p.id);
                false
            } else {
                true
            }
        });
    }

    /// Active players ranked by score, ties kept in join order.
    pub(crate) fn leaderboard(&self) -> Vec<ScoreEntry> {
        let mut rows: Vec<ScoreEntry> = self
            .active_players()
            .map(|p| ScoreEntry {
                player: p.id,
                name: p.name.clone(),
                score: self.scores.get(&p.id).copied().unwrap_or(0),
            })
            .collect();
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One player as a reader sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    /// Left mid-round and waiting to be removed at the round boundary.
    pub left: bool,
}

/// A value copy of a game's state, as delivered through the read port.
///
/// Owns all its data; mutating a snapshot never affects the engine or
/// any later snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub pin: Pin,
    pub status: Status,
    /// Current phase; `None` once the game has terminated.
    pub phase: Option<Phase>,
    pub host_attached: bool,
    pub players: Vec<PlayerSummary>,
    /// 0-based index of the current question.
    pub current_question: usize,
    pub total_questions: usize,
    pub countdown_done: bool,
    pub accepting_answers: bool,
    pub want_answers: usize,
    pub got_answers: usize,
    pub round_players: Vec<PlayerId>,
    pub leaderboard: Vec<ScoreEntry>,
}

impl Snapshot {
    /// Players that haven't left.
    pub fn active_players(&self) -> usize {
        self.players.iter().filter(|p| !p.left).count()
    }

    /// Whether the round counters satisfy the engine's invariant:
    /// while accepting answers, `want == len(round_players)` and
    /// `got <= want`.
    pub fn counters_consistent(&self) -> bool {
        !self.accepting_answers
            || (self.want_answers == self.round_players.len()
                && self.got_answers <= self.want_answers)
    }
}
