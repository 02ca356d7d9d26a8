//! The per-game session engine for Quizhall.
//!
//! Each live game runs as one [`Engine`]: an isolated Tokio task that owns
//! the game's state, advances it through a phase state machine, and
//! serialises every mutation and read against that state. Nothing else
//! ever touches the state directly.
//!
//! ```text
//!  host / players ──Action──→ inbox ─┐
//!  readers ──oneshot sink──→ read port ─┼─→ driver loop ──post()──→ mailboxes
//!  lifetime deadline ─────────────────┘        │
//!                                              └──Reaped──→ coordinator
//! ```
//!
//! # Key types
//!
//! - [`Engine`] — the driver; `run()` returns when the game is over
//! - [`GameHandle`] — submit [`Action`]s and read [`Snapshot`]s
//! - [`Phase`] — the state machine's current phase
//! - [`Coordinator`] — mints PINs, spawns engines, consumes [`Reaped`]
//! - [`GameConfig`] — capacities, timeouts, minimum players, lifetime

mod action;
mod config;
mod coordinator;
mod engine;
mod error;
mod game;
mod handle;
mod phase;
mod reaper;
mod state;

pub use action::{Action, ActionKind};
pub use config::{GameConfig, MIN_PLAYERS};
pub use coordinator::Coordinator;
pub use engine::Engine;
pub use error::GameError;
pub use handle::GameHandle;
pub use phase::Phase;
pub use reaper::{ExitReason, Reaped, reaper_channel};
pub use state::{PlayerSummary, Snapshot};

pub use quizhall_deadline::MAX_GAME_TIME;
