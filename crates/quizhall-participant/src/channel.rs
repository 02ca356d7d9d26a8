//! Channel-backed participants.

use quizhall_protocol::{Codec, ServerMessage};
use tokio::sync::mpsc;

use crate::{Participant, ParticipantError};

/// Forwards each message, still typed, into an unbounded channel.
///
/// The receiving half is whatever sits on the other side: a test, a bot,
/// or a bridge into some other runtime.
#[derive(Debug, Clone)]
pub struct ChannelParticipant {
    sender: mpsc::UnboundedSender<ServerMessage>,
}

impl ChannelParticipant {
    /// Creates a participant and the receiver its messages arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Participant for ChannelParticipant {
    async fn send_message(&self, message: ServerMessage) -> Result<(), ParticipantError> {
        self.sender
            .send(message)
            .map_err(|_| ParticipantError::Closed)
    }
}

/// Encodes each message with a [`Codec`] and forwards the bytes.
///
/// This is the seam a socket transport plugs into: its writer task reads
/// frames from the receiver and puts them on the wire.
#[derive(Debug, Clone)]
pub struct EncodedParticipant<C: Codec> {
    codec: C,
    sender: mpsc::UnboundedSender<Vec<u8>>,
}

impl<C: Codec> EncodedParticipant<C> {
    /// Creates a participant and the receiver its encoded frames arrive on.
    pub fn new(codec: C) -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { codec, sender }, receiver)
    }
}

impl<C: Codec> Participant for EncodedParticipant<C> {
    async fn send_message(&self, message: ServerMessage) -> Result<(), ParticipantError> {
        let frame = self.codec.encode(&message)?;
        self.sender
            .send(frame)
            .map_err(|_| ParticipantError::Closed)
    }
}
