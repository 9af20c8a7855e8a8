use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::reveal::RevealPacing;

/// Pauses that pace a session, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionTimings {
    /// Between a matched Say-Spell-Say phase (or a failed repeat) and the next listen.
    pub relisten_delay_ms: u64,
    /// Between a resolved word and the next one.
    pub advance_delay_ms: u64,
    pub letter_interval_ms: u64,
    pub reveal_hold_ms: u64,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            relisten_delay_ms: 1_000,
            advance_delay_ms: 1_500,
            letter_interval_ms: 300,
            reveal_hold_ms: 2_000,
        }
    }
}

impl SessionTimings {
    pub fn relisten_delay(&self) -> Duration {
        Duration::from_millis(self.relisten_delay_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    pub fn reveal_pacing(&self) -> RevealPacing {
        RevealPacing {
            letter_interval: Duration::from_millis(self.letter_interval_ms),
            hold: Duration::from_millis(self.reveal_hold_ms),
        }
    }

    /// No pauses at all.
    pub fn immediate() -> Self {
        Self {
            relisten_delay_ms: 0,
            advance_delay_ms: 0,
            letter_interval_ms: 0,
            reveal_hold_ms: 0,
        }
    }
}
