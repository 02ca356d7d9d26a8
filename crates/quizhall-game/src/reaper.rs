//! Termination notifications from engines to the coordinator.

use quizhall_protocol::Pin;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// The state machine reached its terminal phase.
    Completed,
    /// The host detached while a round was running.
    HostDetached,
    /// The lifetime deadline fired.
    DeadlineExpired,
}

/// Published exactly once by every engine when it terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaped {
    pub pin: Pin,
    pub reason: ExitReason,
}

impl Reaped {
    /// Whether the game was cut off by its deadline.
    pub fn timed_out(&self) -> bool {
        matches!(self.reason, ExitReason::DeadlineExpired)
    }
}

/// Creates a reaper channel. Engines get clones of the sender; the
/// coordinator keeps the receiver.
pub fn reaper_channel(capacity: usize) -> (mpsc::Sender<Reaped>, mpsc::Receiver<Reaped>) {
    mpsc::channel(capacity.max(1))
}
