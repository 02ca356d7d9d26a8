//! Per-recipient outbound queue.
//!
//! A [`Mailbox`] owns a bounded `mpsc` channel and a Tokio task that drains
//! it into a [`Participant`]. Posting is synchronous and never waits: the
//! game engine calls [`Mailbox::post`] from inside a phase and moves on.

use quizhall_protocol::ServerMessage;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::{Participant, ParticipantError};

/// Default queue depth for a mailbox.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 16;

/// Fire-and-forget handle for sending messages to one participant.
///
/// Cheap to clone; all clones feed the same queue and delivery task.
#[derive(Debug, Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<ServerMessage>,
}

impl Mailbox {
    /// Spawns a delivery task for `participant` and returns its mailbox.
    ///
    /// Must be called from within a Tokio runtime. The task ends when every
    /// clone of the mailbox is dropped or the participant reports
    /// [`ParticipantError::Closed`].
    pub fn spawn<P: Participant>(participant: P, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<ServerMessage>(capacity.max(1));

        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let kind = message.kind();
                match participant.send_message(message).await {
                    Ok(()) => {}
                    Err(ParticipantError::Closed) => {
                        tracing::debug!(%kind, "participant closed, stopping mailbox");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%kind, error = %e, "delivery failed");
                    }
                }
            }
        });

        Self { sender: tx }
    }

    /// Spawns a mailbox with [`DEFAULT_MAILBOX_CAPACITY`].
    pub fn with_default_capacity<P: Participant>(participant: P) -> Self {
        Self::spawn(participant, DEFAULT_MAILBOX_CAPACITY)
    }

    /// Queues a message without waiting.
    ///
    /// # Errors
    /// - [`ParticipantError::Overflow`] — the queue is full, message dropped.
    /// - [`ParticipantError::Closed`] — the delivery task has stopped.
    pub fn post(&self, message: ServerMessage) -> Result<(), ParticipantError> {
        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => ParticipantError::Overflow,
            TrySendError::Closed(_) => ParticipantError::Closed,
        })
    }

    /// Returns `true` once the delivery task has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Completes when the delivery task has stopped.
    pub async fn closed(&self) {
        self.sender.closed().await;
    }
}
