//! Single-flight run coordination.
//!
//! The RunManager owns the session's [`RunState`] and the list of topics
//! used so far. Only one run can hold the state at a time; a start request
//! that arrives while a run is active is ignored.

use crate::engine::{Orchestrator, RunRequest};
use cf_protocol::ipc::Event;
use cf_protocol::run_models::RunState;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

pub struct RunManager {
    /// The engine that executes runs.
    orchestrator: Arc<Orchestrator>,

    /// State of the current or most recent run.
    state: Mutex<RunState>,

    /// Trimmed topics in the order they were first used.
    previous_topics: Mutex<Vec<String>>,

    /// Channel for sending events to the UI.
    events_tx: mpsc::Sender<Event>,
}

impl RunManager {
    pub fn new(orchestrator: Orchestrator, events_tx: mpsc::Sender<Event>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            state: Mutex::new(RunState::default()),
            previous_topics: Mutex::new(Vec::new()),
            events_tx,
        }
    }

    /// Run the pipeline for `topic` to completion.
    ///
    /// Returns the final state, or `None` when the request was ignored
    /// because the topic is blank or another run is in progress.
    pub async fn start(&self, topic: &str) -> Option<RunState> {
        let topic = topic.trim();
        if topic.is_empty() {
            tracing::debug!("ignoring start request with a blank topic");
            return None;
        }
        let Ok(mut state) = self.state.try_lock() else {
            tracing::info!(topic, "run already in progress; ignoring start request");
            return None;
        };

        let previously_used = {
            let mut topics = self.previous_topics.lock().await;
            let seen = topics.iter().any(|t| t == topic);
            if !seen {
                topics.push(topic.to_string());
            }
            seen
        };

        let request = RunRequest {
            topic: topic.to_string(),
            previously_used,
        };
        self.orchestrator
            .run(&request, &mut state, &self.events_tx)
            .await;
        Some(state.clone())
    }

    /// Whether a run currently holds the state.
    pub fn is_running(&self) -> bool {
        self.state.try_lock().is_err()
    }

    /// Topics used so far, oldest first.
    pub async fn previous_topics(&self) -> Vec<String> {
        self.previous_topics.lock().await.clone()
    }

    /// A copy of the current state, or `None` while a run holds it.
    pub fn snapshot(&self) -> Option<RunState> {
        self.state.try_lock().ok().map(|state| state.clone())
    }
}
