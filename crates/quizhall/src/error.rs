//! Unified error type for Quizhall.

use quizhall_game::GameError;
use quizhall_participant::ParticipantError;
use quizhall_protocol::ProtocolError;

/// Top-level error that wraps every sub-crate error.
///
/// Applications built on the `quizhall` crate can use this one type and
/// let `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum QuizhallError {
    /// Encoding, decoding, or an unplayable quiz.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Delivery to a host or player failed.
    #[error(transparent)]
    Participant(#[from] ParticipantError),

    /// A game could not be created or reached.
    #[error(transparent)]
    Game(#[from] GameError),
}

#[cfg(test)]
mod tests {
    use quizhall_protocol::Pin;

    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidQuiz("no questions".into());
        let quizhall_err: QuizhallError = err.into();
        assert!(matches!(quizhall_err, QuizhallError::Protocol(_)));
        assert!(quizhall_err.to_string().contains("no questions"));
    }

    #[test]
    fn test_from_participant_error() {
        let quizhall_err: QuizhallError = ParticipantError::Overflow.into();
        assert!(matches!(quizhall_err, QuizhallError::Participant(_)));
    }

    #[test]
    fn test_from_game_error() {
        let quizhall_err: QuizhallError = GameError::Unavailable(Pin(12)).into();
        assert!(matches!(quizhall_err, QuizhallError::Game(_)));
        assert!(quizhall_err.to_string().contains("000012"));
    }

    #[test]
    fn test_decode_error_passes_through() {
        let json = serde_json::from_str::<Pin>("\"nope\"").unwrap_err();
        let quizhall_err: QuizhallError = ProtocolError::Decode(json).into();
        assert!(quizhall_err.to_string().contains("decode"));
    }
}
