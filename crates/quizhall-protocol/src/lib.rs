//! Wire-level vocabulary for Quizhall.
//!
//! This crate defines the values that cross the boundary of a game engine:
//!
//! - **Types** ([`Pin`], [`PlayerId`], [`Status`]) — who and what a game is.
//! - **Quiz** ([`Quiz`], [`Question`]) — the immutable quiz a game plays.
//! - **Messages** ([`ServerMessage`], [`MessageKind`]) — what the engine
//!   sends to hosts and players.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   turned into bytes for a transport.
//! - **Errors** ([`ProtocolError`]).
//!
//! It knows nothing about tasks, channels, or the state machine.
//!
//! ```text
//! Transport (bytes) ← Protocol (ServerMessage) ← Game engine
//! ```

mod codec;
mod error;
mod message;
mod quiz;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{
    AnswerAck, GameAborted, GameOver, MessageKind, NewQuestion,
    QuestionCount, RoundResult, ScoreEntry, ServerMessage,
};
pub use quiz::{Question, Quiz};
pub use types::{Pin, PlayerId, Status};
