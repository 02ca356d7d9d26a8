//! Error types for the game layer.

use quizhall_protocol::{Pin, ProtocolError};

use crate::ActionKind;

/// Errors that can occur while running or talking to a game.
///
/// The engine never raises these to the sender of an action: precondition
/// failures are logged and dropped, invalid transitions route the game to
/// its ending. Only handle operations and `Engine::run` return them.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// An action arrived when its precondition didn't hold. No-op.
    #[error("{action} rejected: {reason}")]
    PreconditionViolated { action: ActionKind, reason: String },

    /// A phase would have broken an invariant; the game was routed to
    /// its ending instead.
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// The coordinator's reaper channel was closed or stayed full past
    /// the reaper timeout. Fatal.
    #[error("reaper unreachable for game {0}")]
    ReaperUnreachable(Pin),

    /// The game has terminated; its inbox and read port are closed.
    #[error("game {0} is unavailable")]
    Unavailable(Pin),

    /// The inbox stayed full past the submit timeout; the action was
    /// discarded.
    #[error("game {0} is busy, action discarded")]
    Busy(Pin),

    /// The coordinator could not find an unused PIN.
    #[error("no free game PIN")]
    PinSpaceExhausted,

    /// The quiz handed to the coordinator cannot be played.
    #[error(transparent)]
    Quiz(#[from] ProtocolError),
}

impl GameError {
    pub(crate) fn precondition(action: ActionKind, reason: impl Into<String>) -> Self {
        Self::PreconditionViolated {
            action,
            reason: reason.into(),
        }
    }
}
