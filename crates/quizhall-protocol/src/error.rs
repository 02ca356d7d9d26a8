//! Error types for the protocol layer.
//!
//! Each crate in Quizhall defines its own error enum. A `ProtocolError`
//! always means the problem is in the shape of data (encoding, decoding,
//! or a malformed quiz), never in task or channel plumbing.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust value).
    ///
    /// Common causes: malformed JSON, missing required fields,
    /// or truncated messages.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The quiz decoded fine but cannot be played.
    ///
    /// For example a question with no choices, or a correct-choice
    /// index that points past the end of the choice list.
    #[error("invalid quiz: {0}")]
    InvalidQuiz(String),
}
