//! Outbound messages: what a game engine tells its host and players.
//!
//! A transport only needs two things from a message: its [`MessageKind`]
//! (to route or frame it) and its payload. [`ServerMessage`] carries both;
//! it serializes "adjacently tagged":
//!
//! ```text
//! { "kind": "QuestionCount", "payload": { "count": 10 } }
//! ```

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::{PlayerId, Question};

/// The kind of an outbound message, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Host: a new question is on screen.
    NewQuestion,
    /// Player: a countdown has started for the current question.
    QuestionCount,
    /// Player: your answer was recorded.
    AnswerAck,
    /// Host: every round player has answered.
    RoundResult,
    /// Host and players: the quiz is over, here is the leaderboard.
    GameOver,
    /// Host and players: the game stopped early.
    GameAborted,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Payload of [`MessageKind::NewQuestion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: Question,
    /// 1-based position of this question in the quiz.
    pub index: usize,
    /// Total number of questions.
    pub total: usize,
}

/// Payload of [`MessageKind::QuestionCount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCount {
    /// Countdown length in seconds.
    pub count: u32,
}

/// Payload of [`MessageKind::AnswerAck`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerAck {
    /// 1-based question the answer was recorded for.
    pub index: usize,
    pub choice: usize,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player: PlayerId,
    pub name: String,
    pub score: u32,
}

/// Payload of [`MessageKind::RoundResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based question this round was for.
    pub index: usize,
    /// Index of the right choice.
    pub correct: usize,
    /// How many round players answered.
    pub answered: usize,
    /// Answers per choice, in choice order.
    pub tally: Vec<usize>,
    /// Standings after this round, best first.
    pub leaderboard: Vec<ScoreEntry>,
}

/// Payload of [`MessageKind::GameOver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub leaderboard: Vec<ScoreEntry>,
}

/// Payload of [`MessageKind::GameAborted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameAborted {
    /// Human-readable reason, e.g. "time limit reached".
    pub reason: String,
}

/// A message from the engine to a host or player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum ServerMessage {
    NewQuestion(NewQuestion),
    QuestionCount(QuestionCount),
    AnswerAck(AnswerAck),
    RoundResult(RoundResult),
    GameOver(GameOver),
    GameAborted(GameAborted),
}

impl ServerMessage {
    /// The kind tag of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::NewQuestion(_) => MessageKind::NewQuestion,
            Self::QuestionCount(_) => MessageKind::QuestionCount,
            Self::AnswerAck(_) => MessageKind::AnswerAck,
            Self::RoundResult(_) => MessageKind::RoundResult,
            Self::GameOver(_) => MessageKind::GameOver,
            Self::GameAborted(_) => MessageKind::GameAborted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_count_json_format() {
        let msg = ServerMessage::QuestionCount(QuestionCount { count: 10 });
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["kind"], "QuestionCount");
        assert_eq!(json["payload"]["count"], 10);
    }

    #[test]
    fn test_new_question_json_format() {
        let msg = ServerMessage::NewQuestion(NewQuestion {
            question: Question::new("1 + 1?", vec!["2".into(), "3".into()], 0),
            index: 1,
            total: 5,
        });
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["kind"], "NewQuestion");
        assert_eq!(json["payload"]["index"], 1);
        assert_eq!(json["payload"]["total"], 5);
        assert_eq!(json["payload"]["question"]["prompt"], "1 + 1?");
    }

    #[test]
    fn test_game_over_round_trip() {
        let msg = ServerMessage::GameOver(GameOver {
            leaderboard: vec![ScoreEntry {
                player: PlayerId(1),
                name: "ada".into(),
                score: 2,
            }],
        });
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: ServerMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_kind_matches_variant() {
        let abort = ServerMessage::GameAborted(GameAborted {
            reason: "host left".into(),
        });
        assert_eq!(abort.kind(), MessageKind::GameAborted);

        let ack = ServerMessage::AnswerAck(AnswerAck { index: 1, choice: 0 });
        assert_eq!(ack.kind(), MessageKind::AnswerAck);
        assert_eq!(ack.kind().to_string(), "AnswerAck");
    }

    #[test]
    fn test_decode_unknown_kind_returns_error() {
        let unknown = r#"{"kind": "Confetti", "payload": {}}"#;
        let result: Result<ServerMessage, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
