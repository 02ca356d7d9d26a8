//! Identity and status types shared by every Quizhall layer.
//!
//! These are the small values that travel everywhere: in log fields, in
//! state snapshots, and inside outbound messages.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The number players type in to find a game.
///
/// Minted by the coordinator and unique among live games. The engine
/// treats it as opaque: it only logs it and hands it back to the reaper.
///
/// `#[serde(transparent)]` serializes `Pin(42)` as plain `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin(pub u32);

/// PINs are shown to humans zero-padded to six digits: `Pin(42)` → `000042`.
impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// A stable handle for one player within a game.
///
/// Same newtype pattern as [`Pin`]: you can't pass a `Pin` where a
/// `PlayerId` is expected even though both are integers underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Coarse lifecycle status of a game, visible to readers.
///
/// ```text
/// HostWaiting → Waiting → Running → Dead
/// ```
///
/// On the wire a status is its integer value (`HostWaiting = 0` …
/// `Dead = 3`); the `into`/`try_from` serde attributes route through
/// the `u8` conversions below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    /// Waiting for the host to connect.
    #[default]
    HostWaiting = 0,
    /// Host is connected; waiting for enough players and a start signal.
    Waiting = 1,
    /// A round protocol phase is current.
    Running = 2,
    /// Terminated. Absorbing: a dead game never comes back.
    Dead = 3,
}

impl Status {
    /// Returns `true` once the game has terminated.
    pub fn is_dead(self) -> bool {
        matches!(self, Self::Dead)
    }

    /// Returns `true` while players may still join before the first round.
    pub fn is_lobby(self) -> bool {
        matches!(self, Self::HostWaiting | Self::Waiting)
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::HostWaiting),
            1 => Ok(Self::Waiting),
            2 => Ok(Self::Running),
            3 => Ok(Self::Dead),
            other => Err(format!("unknown game status {other}")),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostWaiting => write!(f, "HostWaiting"),
            Self::Waiting => write!(f, "Waiting"),
            Self::Running => write!(f, "Running"),
            Self::Dead => write!(f, "Dead"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_serializes_as_plain_number() {
        let json = serde_json::to_string(&Pin(123456)).unwrap();
        assert_eq!(json, "123456");
    }

    #[test]
    fn test_pin_display_is_zero_padded() {
        assert_eq!(Pin(42).to_string(), "000042");
        assert_eq!(Pin(987654).to_string(), "987654");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(serde_json::to_string(&Status::HostWaiting).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Status::Waiting).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Status::Running).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Status::Dead).unwrap(), "3");
    }

    #[test]
    fn test_status_decodes_from_integer() {
        let status: Status = serde_json::from_str("2").unwrap();
        assert_eq!(status, Status::Running);
    }

    #[test]
    fn test_status_rejects_unknown_integer() {
        let result: Result<Status, _> = serde_json::from_str("9");
        assert!(result.is_err());
    }

    #[test]
    fn test_status_default_is_host_waiting() {
        assert_eq!(Status::default(), Status::HostWaiting);
    }

    #[test]
    fn test_status_predicates() {
        assert!(Status::HostWaiting.is_lobby());
        assert!(Status::Waiting.is_lobby());
        assert!(!Status::Running.is_lobby());
        assert!(Status::Dead.is_dead());
        assert!(!Status::Running.is_dead());
    }
}
