//! Security State
//!
//! Observable NORMAL/BLOCKED state the UI renders from.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::security::SecurityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityPhase {
    Normal,
    Blocked,
}

// == Security State ==
/// Snapshot of the client's security standing.
///
/// Leaves BLOCKED only through [`SecurityState::clear`]; the UI owns any
/// countdown and calls it when the countdown reaches zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityState {
    pub is_blocked: bool,
    pub blocked_reason: Option<String>,
    /// Seconds remaining as reported by the backend when blocked
    pub time_remaining: Option<u64>,
    pub last_error: Option<SecurityError>,
    /// Wall-clock time of the last transition into BLOCKED, for display
    pub blocked_at: Option<DateTime<Utc>>,
}

impl SecurityState {
    pub fn phase(&self) -> SecurityPhase {
        if self.is_blocked {
            SecurityPhase::Blocked
        } else {
            SecurityPhase::Normal
        }
    }

    // == Block ==
    /// Enters (or stays in) BLOCKED, recording the latest classified error.
    ///
    /// The reason is the backend's `blockedReason` when present, otherwise
    /// the error message.
    pub fn block(&mut self, error: &SecurityError) {
        self.is_blocked = true;
        self.blocked_reason = Some(
            error
                .blocked_reason()
                .unwrap_or_else(|| error.message())
                .to_string(),
        );
        self.time_remaining = error.time_remaining();
        self.last_error = Some(error.clone());
        self.blocked_at = Some(Utc::now());
    }

    // == Clear ==
    /// Returns to NORMAL. Returns whether the state was blocked.
    pub fn clear(&mut self) -> bool {
        let was_blocked = self.is_blocked;
        *self = Self::default();
        was_blocked
    }
}
