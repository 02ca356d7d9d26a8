//! Delivery side of a Quizhall game: how the engine reaches hosts and players.
//!
//! The engine never talks to a socket. It sees each host and player only
//! through the [`Participant`] capability ("send this message"), and
//! always through a [`Mailbox`], so a slow recipient can't stall the game.
//!
//! ```text
//! Engine ──post()──→ Mailbox (bounded queue) ──task──→ Participant::send_message
//! ```
//!
//! Two ready-made participants are provided:
//!
//! - [`ChannelParticipant`] forwards typed messages into an in-process
//!   channel (tests, bots, bridges).
//! - [`EncodedParticipant`] encodes with a [`Codec`](quizhall_protocol::Codec)
//!   and forwards bytes, which is what a socket transport plugs into.

mod channel;
mod error;
mod mailbox;

pub use channel::{ChannelParticipant, EncodedParticipant};
pub use error::ParticipantError;
pub use mailbox::{DEFAULT_MAILBOX_CAPACITY, Mailbox};

use std::future::Future;

use quizhall_protocol::ServerMessage;

/// Something a game can send messages to: a host screen or a player device.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → a participant is moved into its own
///   mailbox task and lives as long as that task.
/// - The returned future is `Send` so the mailbox task can be spawned
///   on the multi-threaded runtime.
pub trait Participant: Send + Sync + 'static {
    /// Delivers one message. The kind is available as `message.kind()`.
    ///
    /// Returning [`ParticipantError::Closed`] tells the mailbox that no
    /// further messages can be delivered; it stops its task.
    fn send_message(
        &self,
        message: ServerMessage,
    ) -> impl Future<Output = Result<(), ParticipantError>> + Send;
}
