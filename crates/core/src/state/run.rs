//! Run state transitions.
//!
//! Each function mutates a [`RunState`] and emits the matching [`Event`] so
//! that observers see every change in the order it happened.

use cf_protocol::asset_models::Asset;
use cf_protocol::ipc::Event;
use cf_protocol::log_models::{LogEntry, LogStatus};
use cf_protocol::run_models::{progress_percent, total_steps, GenerationStage, RunState, RunStatus};
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

/// Reset the state for a new run on `topic` and emit `RunStarted`.
///
/// Logs, assets and progress from any previous run are discarded.
pub async fn reset_run(state: &mut RunState, topic: &str, events_tx: &Sender<Event>) {
    *state = RunState {
        run_id: Uuid::new_v4(),
        topic: topic.to_string(),
        status: RunStatus::Running,
        loading: true,
        ..RunState::default()
    };
    let _ = events_tx
        .send(Event::RunStarted {
            run_id: state.run_id,
            topic: state.topic.clone(),
        })
        .await;
}

/// Append a log entry and emit `LogAppended`.
pub async fn log_to_run(
    state: &mut RunState,
    events_tx: &Sender<Event>,
    status: LogStatus,
    message: impl Into<String>,
) {
    let entry = LogEntry {
        id: state.logs.len() as u64,
        status,
        message: message.into(),
    };
    match status {
        LogStatus::Error => tracing::error!(run_id = %state.run_id, "{}", entry.message),
        _ => tracing::info!(run_id = %state.run_id, "{}", entry.message),
    }
    state.logs.push(entry.clone());
    let _ = events_tx
        .send(Event::LogAppended {
            run_id: state.run_id,
            entry,
        })
        .await;
}

/// Mark `stage` as the one in flight. `title_index` is 1-based.
pub async fn begin_stage(
    state: &mut RunState,
    events_tx: &Sender<Event>,
    stage: GenerationStage,
    title_index: Option<usize>,
) {
    state.current_stage = Some(stage);
    let _ = events_tx
        .send(Event::StageStarted {
            run_id: state.run_id,
            stage,
            title_index,
        })
        .await;
}

/// Append a produced asset and emit `AssetCreated`.
pub async fn record_asset(state: &mut RunState, events_tx: &Sender<Event>, asset: Asset) {
    state.assets.push(asset.clone());
    let _ = events_tx
        .send(Event::AssetCreated {
            run_id: state.run_id,
            asset,
        })
        .await;
}

/// Size the progress denominator for `title_count` generated titles.
pub fn set_total_steps(state: &mut RunState, title_count: usize) {
    state.total_steps = total_steps(title_count);
}

/// Count one more completed step and emit the new percentage.
pub async fn advance_progress(state: &mut RunState, events_tx: &Sender<Event>) {
    state.completed_steps += 1;
    let progress = progress_percent(state.completed_steps, state.total_steps);
    // Never move backwards, even if the denominator was not sized yet.
    state.progress = state.progress.max(progress);
    let _ = events_tx
        .send(Event::ProgressUpdated {
            run_id: state.run_id,
            progress: state.progress,
        })
        .await;
}

/// Mark the run as completed with progress at exactly 100.
pub async fn complete_run(state: &mut RunState, events_tx: &Sender<Event>) {
    state.status = RunStatus::Completed;
    state.progress = 100.0;
    let _ = events_tx
        .send(Event::ProgressUpdated {
            run_id: state.run_id,
            progress: state.progress,
        })
        .await;
    let _ = events_tx
        .send(Event::RunCompleted {
            run_id: state.run_id,
        })
        .await;
}

/// Mark the run as failed and emit `RunFailed`.
pub async fn fail_run(state: &mut RunState, events_tx: &Sender<Event>, error: String) {
    state.status = RunStatus::Failed;
    let _ = events_tx
        .send(Event::RunFailed {
            run_id: state.run_id,
            error,
        })
        .await;
}

/// Refuse the run before any stage executes.
///
/// The refusal reason is logged as the run's only error.
pub async fn refuse_run(state: &mut RunState, events_tx: &Sender<Event>, reason: String) {
    log_to_run(state, events_tx, LogStatus::Error, reason.clone()).await;
    state.status = RunStatus::Refused;
    let _ = events_tx
        .send(Event::RunRefused {
            run_id: state.run_id,
            reason,
        })
        .await;
}

/// Clear the loading flag. Called on every exit path of a run.
pub fn finish_loading(state: &mut RunState) {
    state.loading = false;
    state.current_stage = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_protocol::asset_models::AssetKind;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_reset_run() {
        let mut state = RunState::default();
        state.logs.push(LogEntry {
            id: 0,
            status: LogStatus::Info,
            message: "stale".to_string(),
        });
        state.progress = 40.0;
        let (tx, mut rx) = mpsc::channel(10);

        reset_run(&mut state, "coffee", &tx).await;

        assert_eq!(state.status, RunStatus::Running);
        assert!(state.loading);
        assert!(state.logs.is_empty());
        assert_eq!(state.progress, 0.0);
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::RunStarted { topic, .. } if topic == "coffee"));
    }

    #[tokio::test]
    async fn test_reset_run_issues_new_id() {
        let mut state = RunState::default();
        let (tx, _rx) = mpsc::channel(10);

        reset_run(&mut state, "a", &tx).await;
        let first = state.run_id;
        reset_run(&mut state, "a", &tx).await;

        assert_ne!(first, state.run_id);
    }

    #[tokio::test]
    async fn test_log_ids_increase() {
        let mut state = RunState::default();
        let (tx, mut rx) = mpsc::channel(10);

        log_to_run(&mut state, &tx, LogStatus::Info, "one").await;
        log_to_run(&mut state, &tx, LogStatus::Success, "two").await;

        let ids: Vec<u64> = state.logs.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1]);
        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            Event::LogAppended { entry, .. } if entry.message == "one"
        ));
    }

    #[tokio::test]
    async fn test_advance_progress() {
        let mut state = RunState::default();
        let (tx, mut rx) = mpsc::channel(10);
        set_total_steps(&mut state, 1);

        advance_progress(&mut state, &tx).await;
        advance_progress(&mut state, &tx).await;

        assert_eq!(state.completed_steps, 2);
        assert_eq!(state.progress, 40.0);
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::ProgressUpdated { progress, .. } if progress == 20.0));
    }

    #[tokio::test]
    async fn test_complete_run() {
        let mut state = RunState::default();
        let (tx, mut rx) = mpsc::channel(10);

        complete_run(&mut state, &tx).await;

        assert_eq!(state.status, RunStatus::Completed);
        assert_eq!(state.progress, 100.0);
        let _ = rx.recv().await.unwrap();
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::RunCompleted { .. }));
    }

    #[tokio::test]
    async fn test_fail_run() {
        let mut state = RunState::default();
        let (tx, mut rx) = mpsc::channel(10);

        fail_run(&mut state, &tx, "boom".to_string()).await;

        assert_eq!(state.status, RunStatus::Failed);
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::RunFailed { error, .. } if error == "boom"));
    }

    #[tokio::test]
    async fn test_refuse_run_logs_single_error() {
        let mut state = RunState::default();
        let (tx, mut rx) = mpsc::channel(10);

        refuse_run(&mut state, &tx, "Not signed in".to_string()).await;

        assert_eq!(state.status, RunStatus::Refused);
        assert_eq!(state.count_logs(LogStatus::Error), 1);
        let _ = rx.recv().await.unwrap();
        let event = rx.recv().await.unwrap();
        assert!(event.is_terminal());
    }

    #[tokio::test]
    async fn test_record_asset_and_finish_loading() {
        let mut state = RunState {
            loading: true,
            current_stage: Some(GenerationStage::AudioGeneration),
            ..RunState::default()
        };
        let (tx, mut rx) = mpsc::channel(10);

        let asset = Asset::new(AssetKind::Script, "s.txt", "text/plain", b"hi".to_vec(), None);
        record_asset(&mut state, &tx, asset).await;
        finish_loading(&mut state);

        assert_eq!(state.assets.len(), 1);
        assert!(!state.loading);
        assert!(state.current_stage.is_none());
        assert!(matches!(rx.recv().await.unwrap(), Event::AssetCreated { .. }));
    }
}
