//! Handle to a running engine.

use std::time::Duration;

use quizhall_participant::{Mailbox, Participant};
use quizhall_protocol::{Pin, PlayerId, Status};
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::{mpsc, oneshot};

use crate::{Action, GameError, Snapshot};

/// Handle to a running engine: its inbox and its read port.
///
/// Cheap to clone; the coordinator keeps one per game and connection
/// handlers get their own copies. Every operation fails with
/// [`GameError::Unavailable`] once the engine has terminated.
#[derive(Debug, Clone)]
pub struct GameHandle {
    pin: Pin,
    inbox: mpsc::Sender<Action>,
    reads: mpsc::Sender<oneshot::Sender<Snapshot>>,
    submit_timeout: Duration,
    mailbox_capacity: usize,
}

impl GameHandle {
    pub(crate) fn new(
        pin: Pin,
        inbox: mpsc::Sender<Action>,
        reads: mpsc::Sender<oneshot::Sender<Snapshot>>,
        submit_timeout: Duration,
        mailbox_capacity: usize,
    ) -> Self {
        Self {
            pin,
            inbox,
            reads,
            submit_timeout,
            mailbox_capacity,
        }
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Returns `true` once the engine has closed its inbox.
    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }

    /// Queues an action for the engine.
    ///
    /// Success only means the action was enqueued; whether it applies is
    /// decided by the engine, and a rejected action is silently dropped.
    ///
    /// # Errors
    /// - [`GameError::Busy`] — the inbox stayed full past the submit
    ///   timeout and the action was discarded.
    /// - [`GameError::Unavailable`] — the engine has terminated.
    pub async fn submit(&self, action: Action) -> Result<(), GameError> {
        self.inbox
            .send_timeout(action, self.submit_timeout)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => GameError::Busy(self.pin),
                SendTimeoutError::Closed(_) => GameError::Unavailable(self.pin),
            })
    }

    /// Reads a value copy of the game's state.
    ///
    /// The snapshot reflects every action enqueued before this call.
    pub async fn snapshot(&self) -> Result<Snapshot, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.reads
            .send(reply_tx)
            .await
            .map_err(|_| GameError::Unavailable(self.pin))?;
        reply_rx.await.map_err(|_| GameError::Unavailable(self.pin))
    }

    /// The game's status. A terminated engine reports [`Status::Dead`].
    pub async fn status(&self) -> Result<Status, GameError> {
        match self.snapshot().await {
            Ok(snapshot) => Ok(snapshot.status),
            Err(GameError::Unavailable(_)) => Ok(Status::Dead),
            Err(e) => Err(e),
        }
    }

    // -- Convenience wrappers around `submit` -------------------------------

    /// Spawns a mailbox for `host` and asks the engine to attach it.
    pub async fn attach_host<P: Participant>(&self, host: P) -> Result<(), GameError> {
        let host = Mailbox::spawn(host, self.mailbox_capacity);
        self.submit(Action::HostAttach { host }).await
    }

    pub async fn detach_host(&self) -> Result<(), GameError> {
        self.submit(Action::HostDetach).await
    }

    /// Spawns a mailbox for `participant` and asks the engine to add the
    /// player.
    pub async fn join<P: Participant>(
        &self,
        player: PlayerId,
        name: impl Into<String>,
        participant: P,
    ) -> Result<(), GameError> {
        let mailbox = Mailbox::spawn(participant, self.mailbox_capacity);
        self.submit(Action::PlayerJoin {
            player,
            name: name.into(),
            mailbox,
        })
        .await
    }

    pub async fn leave(&self, player: PlayerId) -> Result<(), GameError> {
        self.submit(Action::PlayerLeave { player }).await
    }

    pub async fn start(&self) -> Result<(), GameError> {
        self.submit(Action::HostStart).await
    }

    pub async fn countdown_done(&self) -> Result<(), GameError> {
        self.submit(Action::CountdownDone).await
    }

    pub async fn submit_answer(&self, player: PlayerId, choice: usize) -> Result<(), GameError> {
        self.submit(Action::SubmitAnswer { player, choice }).await
    }

    pub async fn next_question(&self) -> Result<(), GameError> {
        self.submit(Action::HostNext).await
    }

    pub async fn finish(&self) -> Result<(), GameError> {
        self.submit(Action::HostFinish).await
    }
}
