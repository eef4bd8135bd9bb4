//! Event protocol.
//!
//! While a run executes, the core reports every state change as an [`Event`]
//! over a channel so a front end can render progress without polling the run
//! state. Communication is one-directional: core to front end.
//!
//! Uses tagged enum serialization:
//! ```json
//! {
//!   "type": "progressUpdated",
//!   "payload": {
//!     "run_id": "uuid-here",
//!     "progress": 60.0
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::asset_models::Asset;
use crate::log_models::LogEntry;
use crate::run_models::GenerationStage;

/// Events sent from the core to a front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A run has reset the state and started.
    RunStarted { run_id: Uuid, topic: String },

    /// A stage has started. `title_index` is 1-based and absent for the
    /// title-generation stage.
    StageStarted {
        run_id: Uuid,
        stage: GenerationStage,
        title_index: Option<usize>,
    },

    /// A log entry was appended.
    LogAppended { run_id: Uuid, entry: LogEntry },

    /// Progress changed.
    ProgressUpdated { run_id: Uuid, progress: f64 },

    /// An asset was recorded.
    AssetCreated { run_id: Uuid, asset: Asset },

    /// Every stage succeeded.
    RunCompleted { run_id: Uuid },

    /// A fatal error stopped the run.
    RunFailed { run_id: Uuid, error: String },

    /// A precondition failed and no stage executed.
    RunRefused { run_id: Uuid, reason: String },
}

impl Event {
    /// Whether the event ends a run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::RunCompleted { .. } | Event::RunFailed { .. } | Event::RunRefused { .. }
        )
    }
}
