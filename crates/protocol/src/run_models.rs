//! Run state models.
//!
//! This module defines the state a single content-generation run carries and
//! the arithmetic behind its progress percentage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::asset_models::Asset;
use crate::log_models::{LogEntry, LogStatus};

/// Number of progress steps each generated title contributes.
pub const STEPS_PER_TITLE: usize = 4;

/// One discrete step of the pipeline.
///
/// Title generation runs once per topic; the remaining stages run once per
/// generated title in declaration order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    TitleGeneration,
    ScriptGeneration,
    AudioGeneration,
    ImagePromptGeneration,
    ImageGeneration,
    ThumbnailComposition,
}

impl GenerationStage {
    /// The stages executed for every title, in order.
    pub const PER_TITLE: [GenerationStage; 5] = [
        GenerationStage::ScriptGeneration,
        GenerationStage::AudioGeneration,
        GenerationStage::ImagePromptGeneration,
        GenerationStage::ImageGeneration,
        GenerationStage::ThumbnailComposition,
    ];
}

/// Lifecycle status of a run.
///
/// Normal progression: Idle -> Running -> Completed
///
/// Terminal alternatives:
/// - Failed: a generation or composition step failed
/// - Refused: a precondition failed before any stage executed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// No run has started yet.
    #[default]
    Idle,

    /// A run is executing.
    Running,

    /// Every stage of every title succeeded.
    Completed,

    /// A fatal error stopped the run.
    Failed,

    /// The run was refused before any stage executed.
    Refused,
}

/// State of the current (or most recent) run.
///
/// The state is owned by the caller and handed to the orchestrator for the
/// duration of a run. It is reset in full when a new run starts.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RunState {
    /// Identifier of the current run.
    pub run_id: Uuid,

    /// Trimmed topic of the current run.
    pub topic: String,

    /// Lifecycle status.
    pub status: RunStatus,

    /// True while a run is executing.
    pub loading: bool,

    /// Stage currently executing, if any.
    pub current_stage: Option<GenerationStage>,

    /// Progress percentage in `[0, 100]`.
    pub progress: f64,

    /// Steps finished so far.
    pub completed_steps: usize,

    /// Steps the run will take once the titles are known (0 before that).
    pub total_steps: usize,

    /// Append-only log.
    pub logs: Vec<LogEntry>,

    /// Assets in creation order.
    pub assets: Vec<Asset>,
}

impl RunState {
    /// Assets ordered most-recent-first, the way they are displayed.
    pub fn assets_newest_first(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter().rev()
    }

    /// Number of log entries with the given status.
    pub fn count_logs(&self, status: LogStatus) -> usize {
        self.logs.iter().filter(|entry| entry.status == status).count()
    }

    /// The last error message logged, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.logs
            .iter()
            .rev()
            .find(|entry| entry.status == LogStatus::Error)
            .map(|entry| entry.message.as_str())
    }
}

/// Total steps of a run that generated `title_count` titles.
///
/// One step for the title list plus [`STEPS_PER_TITLE`] per title.
pub fn total_steps(title_count: usize) -> usize {
    1 + STEPS_PER_TITLE * title_count
}

/// Progress percentage after `completed` of `total` steps.
///
/// Returns 0 when the total is not known yet.
pub fn progress_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed.min(total) as f64 / total as f64) * 100.0
}
