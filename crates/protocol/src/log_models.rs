//! Run log models.

use serde::{Deserialize, Serialize};

/// Status attached to a log entry.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Info,
    Pending,
    Success,
    Error,
}

/// One entry in a run's append-only log.
///
/// Ids increase monotonically within a run and restart at zero when a new
/// run resets the state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: u64,
    pub status: LogStatus,
    pub message: String,
}
