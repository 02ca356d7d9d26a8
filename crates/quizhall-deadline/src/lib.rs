//! Game lifetime deadline for Quizhall.
//!
//! Every game is armed with a hard deadline when it is created. When the
//! deadline fires the game stops, whatever phase it is in. There is no
//! graceful drain.
//!
//! # Integration
//!
//! The deadline sits inside the engine's `tokio::select!` loop next to the
//! action inbox and the read port:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         biased;
//!         () = deadline.expired() => break,
//!         Some(action) = inbox.recv() => { /* apply */ }
//!         Some(reply) = reads.recv() => { /* snapshot */ }
//!     }
//! }
//! deadline.release();
//! ```
//!
//! [`Deadline::expired`] is cancel-safe: the timer lives inside the
//! `Deadline`, so losing a `select!` race doesn't reset it.

use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant, Sleep};
use tracing::{debug, info, warn};

/// Upper bound on any game's lifetime.
pub const MAX_GAME_TIME: Duration = Duration::from_secs(45 * 60);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How long a game may live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifetimeConfig {
    /// Requested lifetime. Zero selects [`MAX_GAME_TIME`]; anything above
    /// it is clamped down.
    pub max_lifetime: Duration,
}

impl LifetimeConfig {
    /// Create a config with a specific requested lifetime.
    pub fn with_max(max_lifetime: Duration) -> Self {
        Self { max_lifetime }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`Deadline::arm`].
    pub fn validated(mut self) -> Self {
        if self.max_lifetime > MAX_GAME_TIME {
            warn!(
                requested_secs = self.max_lifetime.as_secs(),
                max_secs = MAX_GAME_TIME.as_secs(),
                "max_lifetime exceeds maximum game time, clamping"
            );
            self.max_lifetime = MAX_GAME_TIME;
        }
        self
    }

    /// The lifetime actually enforced: `min(max_lifetime, MAX_GAME_TIME)`,
    /// with zero meaning "use the maximum".
    pub fn effective(&self) -> Duration {
        if self.max_lifetime.is_zero() {
            MAX_GAME_TIME
        } else {
            self.max_lifetime.min(MAX_GAME_TIME)
        }
    }
}

// ---------------------------------------------------------------------------
// Deadline
// ---------------------------------------------------------------------------

/// A single-shot, releasable timer bounding one game's lifetime.
///
/// Fires at most once. After it fires, or after [`release`](Self::release),
/// [`expired`](Self::expired) pends forever.
pub struct Deadline {
    lifetime: Duration,
    expires_at: Instant,
    /// The armed timer. `None` once fired or released, which also frees
    /// the timer entry in the runtime.
    sleep: Option<Pin<Box<Sleep>>>,
    fired: bool,
}

impl Deadline {
    /// Arms a deadline for `config.effective()` from now.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn arm(config: LifetimeConfig) -> Self {
        let lifetime = config.validated().effective();
        let expires_at = Instant::now() + lifetime;

        debug!(lifetime_ms = lifetime.as_millis() as u64, "deadline armed");

        Self {
            lifetime,
            expires_at,
            sleep: Some(Box::pin(time::sleep_until(expires_at))),
            fired: false,
        }
    }

    /// Arms a deadline for a specific lifetime (still capped at
    /// [`MAX_GAME_TIME`]).
    pub fn after(lifetime: Duration) -> Self {
        Self::arm(LifetimeConfig::with_max(lifetime))
    }

    /// Completes when the deadline fires.
    ///
    /// Resolves exactly once over the deadline's life. Once fired or
    /// released, this future pends forever, so a `select!` loop simply
    /// stops seeing this branch.
    pub async fn expired(&mut self) {
        let Some(sleep) = self.sleep.as_mut() else {
            return std::future::pending::<()>().await;
        };

        sleep.as_mut().await;

        self.sleep = None;
        self.fired = true;
        info!(
            lifetime_ms = self.lifetime.as_millis() as u64,
            "deadline fired"
        );
    }

    /// Disarms the deadline and frees its timer.
    ///
    /// Safe to call multiple times (idempotent), and after firing.
    pub fn release(&mut self) {
        if self.sleep.take().is_some() {
            debug!(
                remaining_ms = self.remaining().as_millis() as u64,
                "deadline released"
            );
        }
    }

    /// Whether the deadline has fired.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Whether the deadline is still armed (neither fired nor released).
    pub fn is_armed(&self) -> bool {
        self.sleep.is_some()
    }

    /// The enforced lifetime.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// The instant at which the deadline fires (or would have fired).
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Time left until the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

impl std::fmt::Debug for Deadline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deadline")
            .field("lifetime", &self.lifetime)
            .field("armed", &self.is_armed())
            .field("fired", &self.fired)
            .finish()
    }
}
