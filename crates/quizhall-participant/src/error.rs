use quizhall_protocol::ProtocolError;

/// Errors that can occur while delivering a message to a participant.
#[derive(Debug, thiserror::Error)]
pub enum ParticipantError {
    /// The participant's connection (or mailbox) is gone.
    #[error("participant closed")]
    Closed,

    /// The mailbox queue is full; the message was dropped.
    #[error("mailbox full, message dropped")]
    Overflow,

    /// The message could not be encoded for the wire.
    #[error(transparent)]
    Encode(#[from] ProtocolError),

    /// The transport refused the message for its own reasons.
    #[error("delivery rejected: {0}")]
    Rejected(String),
}
