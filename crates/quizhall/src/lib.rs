//! # Quizhall
//!
//! Live multiplayer quiz sessions. A host drives a quiz, players answer
//! each question, and every game runs as its own isolated actor.
//!
//! This crate re-exports the pieces most applications need; the
//! sub-crates can also be used directly.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use quizhall::prelude::*;
//!
//! # async fn demo() -> Result<(), QuizhallError> {
//! let quiz = Quiz::new(
//!     "Warm-up",
//!     vec![Question::new("2 + 2?", vec!["3".into(), "4".into()], 1)],
//! );
//! let mut coordinator = Coordinator::new();
//! let pin = coordinator.create_game(Arc::new(quiz))?;
//!
//! let (host, _host_rx) = ChannelParticipant::new();
//! if let Some(game) = coordinator.handle(pin) {
//!     game.attach_host(host).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod telemetry;

pub use error::QuizhallError;

pub use quizhall_deadline as deadline;
pub use quizhall_game as game;
pub use quizhall_participant as participant;
pub use quizhall_protocol as protocol;

pub mod prelude {
    pub use crate::QuizhallError;
    pub use quizhall_game::{
        Action, Coordinator, Engine, ExitReason, GameConfig, GameError, GameHandle, MAX_GAME_TIME,
        MIN_PLAYERS, Phase, Reaped, Snapshot,
    };
    pub use quizhall_participant::{ChannelParticipant, EncodedParticipant, Mailbox, Participant};
    pub use quizhall_protocol::{
        JsonCodec, MessageKind, Pin, PlayerId, Question, Quiz, ServerMessage, Status,
    };
}
