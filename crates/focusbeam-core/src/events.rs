use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{DailyStats, SessionType, Snapshot};

/// Every state change in the session timer produces an Event.
/// Hosts render from snapshots; events are for logs and scripting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session_type: SessionType,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        session_type: SessionType,
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        session_type: SessionType,
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        session_type: SessionType,
        duration_min: u32,
        stats: DailyStats,
        at: DateTime<Utc>,
    },
    TimerReset {
        session_type: SessionType,
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    SessionSelected {
        from: SessionType,
        to: SessionType,
        /// True when the switch stopped a running countdown.
        interrupted: bool,
        at: DateTime<Utc>,
    },
    DurationChanged {
        session_type: SessionType,
        minutes: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        snapshot: Snapshot,
        at: DateTime<Utc>,
    },
}
